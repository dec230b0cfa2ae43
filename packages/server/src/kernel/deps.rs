//! Server dependencies for domain activities (using traits for testability)
//!
//! This module provides the central dependency container used by the registration
//! flow and the session issuer. All external services use trait abstractions.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use twilio::TwilioService;

use crate::common::{VendorId, VendorStatus};
use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::domains::registration::models::VerificationChallenge;
use crate::domains::vendor::models::{InsertOutcome, VendorAccount};
use crate::kernel::{
    BaseAccountStore, BaseChallengeStore, BaseClock, BaseEmailService, BaseOtpGenerator,
    BasePasswordHasher, BaseSmsService,
};

// =============================================================================
// Postgres stores (thin wrappers over the models/ SQL)
// =============================================================================

pub struct PostgresChallengeStore {
    pool: PgPool,
}

impl PostgresChallengeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseChallengeStore for PostgresChallengeStore {
    async fn upsert(&self, challenge: &VerificationChallenge) -> Result<VerificationChallenge> {
        challenge.upsert(&self.pool).await
    }

    async fn find(&self, identifier: &str) -> Result<Option<VerificationChallenge>> {
        VerificationChallenge::find(identifier, &self.pool).await
    }

    async fn mark_verified(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationChallenge>> {
        VerificationChallenge::mark_verified(identifier, code, now, &self.pool).await
    }

    async fn delete(&self, identifier: &str) -> Result<bool> {
        VerificationChallenge::delete(identifier, &self.pool).await
    }

    async fn delete_if_code(&self, identifier: &str, code: &str) -> Result<bool> {
        VerificationChallenge::delete_if_code(identifier, code, &self.pool).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        VerificationChallenge::delete_expired(now, &self.pool).await
    }
}

pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAccountStore for PostgresAccountStore {
    async fn find_by_id(&self, id: VendorId) -> Result<Option<VendorAccount>> {
        VendorAccount::find_by_id(id, &self.pool).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<VendorAccount>> {
        VendorAccount::find_by_email(email, &self.pool).await
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<VendorAccount>> {
        VendorAccount::find_by_phone(phone_number, &self.pool).await
    }

    async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<VendorAccount>> {
        VendorAccount::find_by_contact(email, phone_number, &self.pool).await
    }

    async fn insert(&self, account: &VendorAccount) -> Result<InsertOutcome> {
        account.insert(&self.pool).await
    }

    async fn set_refresh_token(&self, id: VendorId, refresh_token: Option<&str>) -> Result<bool> {
        VendorAccount::set_refresh_token(id, refresh_token, &self.pool).await
    }

    async fn list(&self, status: Option<VendorStatus>) -> Result<Vec<VendorAccount>> {
        VendorAccount::list(status, &self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService trait
pub struct TwilioSmsAdapter(pub Arc<TwilioService>);

impl TwilioSmsAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioSmsAdapter {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        self.0
            .send_sms(to, body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// OTP generator and clock
// =============================================================================

pub struct RandomOtpGenerator;

impl BaseOtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        rand::thread_rng().gen_range(100_000..=999_999).to_string()
    }
}

pub struct SystemClock;

impl BaseClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Lifetimes and switches the domain reads from configuration
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub otp_ttl: chrono::Duration,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    /// Bound for every outbound email / SMS call
    pub external_call_timeout: Duration,
    pub allow_admin_self_registration: bool,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            otp_ttl: chrono::Duration::minutes(config.otp_ttl_minutes),
            access_token_ttl: chrono::Duration::minutes(config.access_token_ttl_minutes),
            refresh_token_ttl: chrono::Duration::days(config.refresh_token_ttl_days),
            external_call_timeout: Duration::from_secs(config.external_call_timeout_secs),
            allow_admin_self_registration: config.allow_admin_self_registration,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            otp_ttl: chrono::Duration::minutes(15),
            access_token_ttl: chrono::Duration::minutes(15),
            refresh_token_ttl: chrono::Duration::days(7),
            external_call_timeout: Duration::from_secs(5),
            allow_admin_self_registration: false,
        }
    }
}

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub challenges: Arc<dyn BaseChallengeStore>,
    pub accounts: Arc<dyn BaseAccountStore>,
    pub email: Arc<dyn BaseEmailService>,
    pub sms: Arc<dyn BaseSmsService>,
    pub password_hasher: Arc<dyn BasePasswordHasher>,
    pub otp_generator: Arc<dyn BaseOtpGenerator>,
    pub clock: Arc<dyn BaseClock>,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    pub settings: AuthSettings,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        challenges: Arc<dyn BaseChallengeStore>,
        accounts: Arc<dyn BaseAccountStore>,
        email: Arc<dyn BaseEmailService>,
        sms: Arc<dyn BaseSmsService>,
        password_hasher: Arc<dyn BasePasswordHasher>,
        otp_generator: Arc<dyn BaseOtpGenerator>,
        clock: Arc<dyn BaseClock>,
        jwt_service: Arc<JwtService>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            challenges,
            accounts,
            email,
            sms,
            password_hasher,
            otp_generator,
            clock,
            jwt_service,
            settings,
        }
    }
}
