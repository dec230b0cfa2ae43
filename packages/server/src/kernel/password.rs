use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::kernel::BasePasswordHasher;

/// Lowest bcrypt cost accepted for stored passwords
pub const MIN_BCRYPT_COST: u32 = 12;

/// bcrypt hashing on the blocking pool
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.max(MIN_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(MIN_BCRYPT_COST)
    }
}

#[async_trait]
impl BasePasswordHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .context("password hashing task panicked")?
            .context("failed to hash password")
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
            .await
            .context("password verification task panicked")?
            .context("stored password digest is malformed")
    }
}
