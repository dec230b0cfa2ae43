// TestDependencies - mock implementations for testing
//
// Provides in-memory stores and recording transports that can be injected into
// ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    AuthSettings, BaseAccountStore, BaseChallengeStore, BaseClock, BaseEmailService,
    BaseOtpGenerator, BasePasswordHasher, BaseSmsService, EmailMessage, ServerDeps,
};
use crate::common::{VendorId, VendorStatus};
use crate::domains::auth::JwtService;
use crate::domains::registration::models::VerificationChallenge;
use crate::domains::vendor::models::{InsertOutcome, VendorAccount};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-vendor-onboarding";
pub const TEST_JWT_ISSUER: &str = "vendor-onboarding";

// =============================================================================
// Mock Challenge Store
// =============================================================================

#[derive(Clone, Default)]
pub struct MockChallengeStore {
    challenges: Arc<Mutex<HashMap<String, VerificationChallenge>>>,
}

impl MockChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a challenge directly (bypassing issue)
    pub fn with_challenge(self, challenge: VerificationChallenge) -> Self {
        self.challenges
            .lock()
            .unwrap()
            .insert(challenge.identifier.clone(), challenge);
        self
    }

    pub fn get(&self, identifier: &str) -> Option<VerificationChallenge> {
        self.challenges.lock().unwrap().get(identifier).cloned()
    }

    pub fn len(&self) -> usize {
        self.challenges.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseChallengeStore for MockChallengeStore {
    async fn upsert(&self, challenge: &VerificationChallenge) -> Result<VerificationChallenge> {
        let mut challenges = self.challenges.lock().unwrap();
        let mut stored = challenge.clone();
        stored.verified = false;
        if let Some(existing) = challenges.get(&challenge.identifier) {
            stored.created_at = existing.created_at;
        }
        challenges.insert(stored.identifier.clone(), stored.clone());
        Ok(stored)
    }

    async fn find(&self, identifier: &str) -> Result<Option<VerificationChallenge>> {
        Ok(self.get(identifier))
    }

    async fn mark_verified(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationChallenge>> {
        let mut challenges = self.challenges.lock().unwrap();
        match challenges.get_mut(identifier) {
            Some(challenge) if challenge.code == code && !challenge.verified => {
                challenge.verified = true;
                challenge.updated_at = now;
                Ok(Some(challenge.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, identifier: &str) -> Result<bool> {
        Ok(self.challenges.lock().unwrap().remove(identifier).is_some())
    }

    async fn delete_if_code(&self, identifier: &str, code: &str) -> Result<bool> {
        let mut challenges = self.challenges.lock().unwrap();
        match challenges.get(identifier) {
            Some(challenge) if challenge.code == code => {
                challenges.remove(identifier);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut challenges = self.challenges.lock().unwrap();
        let before = challenges.len();
        challenges.retain(|_, c| c.expires_at >= now);
        Ok((before - challenges.len()) as u64)
    }
}

// =============================================================================
// Mock Account Store
// =============================================================================

/// In-memory accounts with the same unique fields as the database indexes
#[derive(Clone, Default)]
pub struct MockAccountStore {
    accounts: Arc<Mutex<Vec<VendorAccount>>>,
    unreachable: Arc<Mutex<bool>>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, account: VendorAccount) -> Self {
        self.accounts.lock().unwrap().push(account);
        self
    }

    pub fn accounts(&self) -> Vec<VendorAccount> {
        self.accounts.lock().unwrap().clone()
    }

    pub fn get(&self, id: VendorId) -> Option<VendorAccount> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Make `ping` fail, as a lost database connection would
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    /// Change an account's status, as an approval workflow would
    pub fn set_status(&self, id: VendorId, status: VendorStatus) {
        if let Some(account) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            account.status = status;
        }
    }

    fn duplicate_of(accounts: &[VendorAccount], candidate: &VendorAccount) -> Option<&'static str> {
        for existing in accounts {
            if existing.contact_details.email.to_lowercase()
                == candidate.contact_details.email.to_lowercase()
            {
                return Some("email");
            }
            if existing.contact_details.phone_number == candidate.contact_details.phone_number {
                return Some("phone_number");
            }
            if existing.company_info.gst_number == candidate.company_info.gst_number {
                return Some("gst_number");
            }
        }
        None
    }
}

#[async_trait]
impl BaseAccountStore for MockAccountStore {
    async fn find_by_id(&self, id: VendorId) -> Result<Option<VendorAccount>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<VendorAccount>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.contact_details.email.to_lowercase() == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<VendorAccount>> {
        let phone_number = phone_number.trim();
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.contact_details.phone_number == phone_number)
            .cloned())
    }

    async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<VendorAccount>> {
        if let Some(email) = email {
            if let Some(account) = self.find_by_email(email).await? {
                return Ok(Some(account));
            }
        }
        match phone_number {
            Some(phone_number) => self.find_by_phone(phone_number).await,
            None => Ok(None),
        }
    }

    async fn insert(&self, account: &VendorAccount) -> Result<InsertOutcome> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(field) = Self::duplicate_of(&accounts, account) {
            return Ok(InsertOutcome::Duplicate(field));
        }
        accounts.push(account.clone());
        Ok(InsertOutcome::Created(account.clone()))
    }

    async fn set_refresh_token(&self, id: VendorId, refresh_token: Option<&str>) -> Result<bool> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.refresh_token = refresh_token.map(str::to_string);
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, status: Option<VendorStatus>) -> Result<Vec<VendorAccount>> {
        let mut accounts: Vec<VendorAccount> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn ping(&self) -> Result<()> {
        if *self.unreachable.lock().unwrap() {
            anyhow::bail!("mock account store is unreachable");
        }
        Ok(())
    }
}

// =============================================================================
// Mock Email / SMS Services
// =============================================================================

#[derive(Clone, Default)]
pub struct MockEmailService {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again)
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent_to(&self, to: &str) -> Option<EmailMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("mock email transport is down");
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// An SMS captured by MockSmsService
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockSmsService {
    sent: Arc<Mutex<Vec<SentSms>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("mock sms transport is down");
        }
        self.sent.lock().unwrap().push(SentSms {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Password Hasher
// =============================================================================

/// Reversible stand-in for bcrypt so tests stay fast
#[derive(Clone, Copy, Default)]
pub struct MockPasswordHasher;

impl MockPasswordHasher {
    pub fn digest_of(plaintext: &str) -> String {
        format!("mock-hash${}", plaintext)
    }
}

#[async_trait]
impl BasePasswordHasher for MockPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(Self::digest_of(plaintext))
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        match digest.strip_prefix("mock-hash$") {
            Some(stored) => Ok(stored == plaintext),
            None => anyhow::bail!("not a mock digest"),
        }
    }
}

// =============================================================================
// Fixed OTP Generator and Mock Clock
// =============================================================================

/// Hands out queued codes in order, then repeats the fallback
#[derive(Clone)]
pub struct FixedOtpGenerator {
    queued: Arc<Mutex<Vec<String>>>,
    fallback: String,
}

impl FixedOtpGenerator {
    pub fn new(code: &str) -> Self {
        Self {
            queued: Arc::new(Mutex::new(Vec::new())),
            fallback: code.to_string(),
        }
    }

    /// Queue a code to be returned by the next `generate` call
    pub fn push_code(&self, code: &str) {
        self.queued.lock().unwrap().push(code.to_string());
    }
}

impl BaseOtpGenerator for FixedOtpGenerator {
    fn generate(&self) -> String {
        let mut queued = self.queued.lock().unwrap();
        if queued.is_empty() {
            self.fallback.clone()
        } else {
            queued.remove(0)
        }
    }
}

#[derive(Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap())
    }
}

impl BaseClock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Every mock wired into one ServerDeps; handles stay available for assertions
#[derive(Clone)]
pub struct TestDependencies {
    pub challenges: MockChallengeStore,
    pub accounts: MockAccountStore,
    pub email: MockEmailService,
    pub sms: MockSmsService,
    pub otp_generator: FixedOtpGenerator,
    pub clock: MockClock,
    pub settings: AuthSettings,
    pub password_hasher: Arc<dyn BasePasswordHasher>,
}

impl TestDependencies {
    /// Mocks with the fixed code `123456`
    pub fn new() -> Self {
        Self {
            challenges: MockChallengeStore::new(),
            accounts: MockAccountStore::new(),
            email: MockEmailService::new(),
            sms: MockSmsService::new(),
            otp_generator: FixedOtpGenerator::new("123456"),
            clock: MockClock::default(),
            settings: AuthSettings::default(),
            password_hasher: Arc::new(MockPasswordHasher),
        }
    }

    pub fn with_settings(mut self, settings: AuthSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_password_hasher(mut self, hasher: Arc<dyn BasePasswordHasher>) -> Self {
        self.password_hasher = hasher;
        self
    }

    pub fn jwt_service(&self) -> JwtService {
        JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            Arc::new(self.challenges.clone()),
            Arc::new(self.accounts.clone()),
            Arc::new(self.email.clone()),
            Arc::new(self.sms.clone()),
            self.password_hasher.clone(),
            Arc::new(self.otp_generator.clone()),
            Arc::new(self.clock.clone()),
            Arc::new(self.jwt_service()),
            self.settings.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
