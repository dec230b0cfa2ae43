use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::VerificationMethod;

/// Ephemeral OTP challenge, keyed by the normalized email or phone number.
///
/// Never promoted into an account; deleted once consumed or expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VerificationChallenge {
    pub identifier: String,
    pub code: String,
    pub method: VerificationMethod,
    pub verified: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VerificationChallenge {
    pub fn new(
        identifier: String,
        code: String,
        method: VerificationMethod,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            identifier,
            code,
            method,
            verified: false,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    /// A challenge is expired strictly after its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl VerificationChallenge {
    /// Insert or replace the challenge for this identifier (resets `verified`)
    pub async fn upsert(&self, pool: &PgPool) -> Result<Self> {
        let challenge = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO verification_challenges
                (identifier, code, method, verified, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, false, $4, $5, $5)
            ON CONFLICT (identifier) DO UPDATE
               SET code = EXCLUDED.code,
                   method = EXCLUDED.method,
                   verified = false,
                   expires_at = EXCLUDED.expires_at,
                   updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(&self.identifier)
        .bind(&self.code)
        .bind(self.method)
        .bind(self.expires_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await?;
        Ok(challenge)
    }

    pub async fn find(identifier: &str, pool: &PgPool) -> Result<Option<Self>> {
        let challenge = sqlx::query_as::<_, Self>(
            "SELECT * FROM verification_challenges WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;
        Ok(challenge)
    }

    /// Flip `verified` if the code matches and the challenge is still unverified.
    ///
    /// Returns `None` when another request got there first or the code changed.
    pub async fn mark_verified(
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let challenge = sqlx::query_as::<_, Self>(
            r#"
            UPDATE verification_challenges
               SET verified = true, updated_at = $3
             WHERE identifier = $1 AND code = $2 AND verified = false
            RETURNING *
            "#,
        )
        .bind(identifier)
        .bind(code)
        .bind(now)
        .fetch_optional(pool)
        .await?;
        Ok(challenge)
    }

    pub async fn delete(identifier: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM verification_challenges WHERE identifier = $1")
            .bind(identifier)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_if_code(identifier: &str, code: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM verification_challenges WHERE identifier = $1 AND code = $2",
        )
        .bind(identifier)
        .bind(code)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Housekeeping: drop every challenge past its expiry
    pub async fn delete_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM verification_challenges WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_challenge_is_unverified() {
        let now = Utc::now();
        let challenge = VerificationChallenge::new(
            "v@x.com".to_string(),
            "123456".to_string(),
            VerificationMethod::Email,
            now,
            Duration::minutes(15),
        );
        assert!(!challenge.verified);
        assert_eq!(challenge.expires_at, now + Duration::minutes(15));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let challenge = VerificationChallenge::new(
            "v@x.com".to_string(),
            "123456".to_string(),
            VerificationMethod::Email,
            now,
            Duration::minutes(15),
        );
        assert!(!challenge.is_expired(challenge.expires_at));
        assert!(challenge.is_expired(challenge.expires_at + Duration::seconds(1)));
    }
}
