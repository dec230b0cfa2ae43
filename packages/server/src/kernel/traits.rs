// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The registration state machine and session issuer are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAccountStore, BaseSmsService)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{VendorId, VendorStatus};
use crate::domains::registration::models::VerificationChallenge;
use crate::domains::vendor::models::{InsertOutcome, VendorAccount};

// =============================================================================
// Challenge Store Trait (Infrastructure - ephemeral OTP records)
// =============================================================================

#[async_trait]
pub trait BaseChallengeStore: Send + Sync {
    /// Insert or replace the challenge for its identifier; `verified` is reset
    async fn upsert(&self, challenge: &VerificationChallenge) -> Result<VerificationChallenge>;

    async fn find(&self, identifier: &str) -> Result<Option<VerificationChallenge>>;

    /// Atomically set `verified` when the code matches an unverified challenge
    async fn mark_verified(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationChallenge>>;

    /// Returns whether a challenge was removed
    async fn delete(&self, identifier: &str) -> Result<bool>;

    /// Remove the challenge only while it still holds `code`
    async fn delete_if_code(&self, identifier: &str, code: &str) -> Result<bool>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

// =============================================================================
// Account Store Trait (Infrastructure - durable vendor accounts)
// =============================================================================

#[async_trait]
pub trait BaseAccountStore: Send + Sync {
    async fn find_by_id(&self, id: VendorId) -> Result<Option<VendorAccount>>;

    /// Case-insensitive on email
    async fn find_by_email(&self, email: &str) -> Result<Option<VendorAccount>>;

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<VendorAccount>>;

    /// Any account matching either value
    async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<VendorAccount>>;

    /// Atomic insert; duplicates on any unique field are reported, not raised
    async fn insert(&self, account: &VendorAccount) -> Result<InsertOutcome>;

    /// Returns false when no such account exists
    async fn set_refresh_token(&self, id: VendorId, refresh_token: Option<&str>) -> Result<bool>;

    /// Newest first
    async fn list(&self, status: Option<VendorStatus>) -> Result<Vec<VendorAccount>>;

    /// Cheap round trip used by the health check
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Notification Traits (Infrastructure - outbound email / SMS)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Password Hashing Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BasePasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String>;

    /// `Ok(false)` for a wrong password; `Err` only for a malformed digest
    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool>;
}

// =============================================================================
// OTP Generator and Clock (Infrastructure - injectable for tests)
// =============================================================================

pub trait BaseOtpGenerator: Send + Sync {
    /// Six ASCII digits, 100000..=999999
    fn generate(&self) -> String;
}

pub trait BaseClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
