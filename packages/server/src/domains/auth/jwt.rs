use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Role, VendorId, VendorStatus};
use crate::domains::vendor::models::VendorAccount;

/// Which half of a session a token represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity carried by both access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: VendorId,
    pub email: String,
    pub role: Role,
    /// Present only for vendors
    pub status: Option<VendorStatus>,
}

impl TokenSubject {
    /// Derive the token payload from the current account state
    pub fn for_account(account: &VendorAccount) -> Self {
        Self {
            user_id: account.id,
            email: account.contact_details.email.clone(),
            role: account.role,
            status: (account.role == Role::Vendor).then_some(account.status),
        }
    }
}

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,       // Subject (account id as string)
    pub user_id: VendorId, // Account UUID
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VendorStatus>,
    pub kind: TokenKind,
    pub exp: i64, // Expiration timestamp
    pub iat: i64, // Issued at timestamp
    pub iss: String,
    pub jti: String, // Unique per token, so two logins in one second differ
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Sign a token of the given kind that expires after `ttl`
    pub fn create_token(
        &self,
        subject: &TokenSubject,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: subject.user_id.to_string(),
            user_id: subject.user_id,
            email: subject.email.clone(),
            role: subject.role,
            status: subject.status,
            kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify signature, issuer and expiry, and require the expected kind
    pub fn verify_token(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;
        if claims.kind != expected {
            anyhow::bail!("expected {:?} token, got {:?}", expected, claims.kind);
        }
        Ok(claims)
    }
}
