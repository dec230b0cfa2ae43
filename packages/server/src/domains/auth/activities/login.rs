//! Login activity

use tracing::{info, warn};

use crate::common::{OnboardingError, OnboardingResult, Role};
use crate::domains::auth::jwt::{TokenKind, TokenSubject};
use crate::domains::auth::types::LoginResult;
use crate::domains::vendor::models::{normalize_email, normalize_phone, VendorAccount};
use crate::kernel::ServerDeps;

/// How the caller identified themselves at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Phone(String),
}

impl LoginIdentifier {
    /// Anything containing `@` is an email; everything else a phone number.
    pub fn parse(raw: &str) -> OnboardingResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(OnboardingError::invalid_input("email or phone number is required"));
        }
        if raw.contains('@') {
            Ok(Self::Email(normalize_email(raw)))
        } else {
            Ok(Self::Phone(normalize_phone(raw)))
        }
    }
}

/// Check credentials for `expected_role` and open a session.
///
/// Unknown accounts and wrong passwords fail identically and both pay one
/// password hashing round. The role is checked
/// only after the password, and account status is not checked at all: a
/// pending vendor gets tokens but is stopped by the policy gate.
pub async fn login(
    identifier: &str,
    password: &str,
    expected_role: Role,
    deps: &ServerDeps,
) -> OnboardingResult<LoginResult> {
    let identifier = LoginIdentifier::parse(identifier)?;
    if password.is_empty() {
        return Err(OnboardingError::invalid_input("password is required"));
    }

    let account = match &identifier {
        LoginIdentifier::Email(email) => deps.accounts.find_by_email(email).await?,
        LoginIdentifier::Phone(phone) => deps.accounts.find_by_phone(phone).await?,
    };
    let Some(account) = account else {
        // Same hashing work as a wrong password
        if let Err(e) = deps.password_hasher.hash(password).await {
            warn!("Password hashing for unknown account failed: {}", e);
        }
        return Err(OnboardingError::InvalidCredentials);
    };

    if !password_matches(password, &account, deps).await {
        return Err(OnboardingError::InvalidCredentials);
    }

    if account.role != expected_role {
        return Err(OnboardingError::RoleMismatch);
    }

    let subject = TokenSubject::for_account(&account);
    let access_token =
        deps.jwt_service
            .create_token(&subject, TokenKind::Access, deps.settings.access_token_ttl)?;
    let refresh_token =
        deps.jwt_service
            .create_token(&subject, TokenKind::Refresh, deps.settings.refresh_token_ttl)?;

    if !deps
        .accounts
        .set_refresh_token(account.id, Some(&refresh_token))
        .await?
    {
        // Account vanished between lookup and update
        return Err(OnboardingError::InvalidCredentials);
    }

    info!(vendor_id = %account.id, role = %account.role, "Login succeeded");

    let mut account = account;
    account.refresh_token = Some(refresh_token.clone());
    Ok(LoginResult {
        access_token,
        refresh_token,
        user: account.into(),
    })
}

/// A malformed stored digest counts as a mismatch
async fn password_matches(password: &str, account: &VendorAccount, deps: &ServerDeps) -> bool {
    match deps
        .password_hasher
        .verify(password, &account.password_hash)
        .await
    {
        Ok(matches) => matches,
        Err(e) => {
            warn!(vendor_id = %account.id, "Password verification failed: {}", e);
            false
        }
    }
}
