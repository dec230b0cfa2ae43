//! Refresh activity

use tracing::info;

use crate::common::{OnboardingError, OnboardingResult};
use crate::domains::auth::jwt::{TokenKind, TokenSubject};
use crate::domains::auth::types::RefreshResult;
use crate::kernel::ServerDeps;

/// Exchange the account's current refresh token for a new access token.
///
/// The refresh token itself is not rotated. The payload is rebuilt from the
/// stored account, so a status change since login shows up here.
pub async fn refresh(refresh_token: &str, deps: &ServerDeps) -> OnboardingResult<RefreshResult> {
    let claims = deps
        .jwt_service
        .verify_token(refresh_token, TokenKind::Refresh)
        .map_err(|_| OnboardingError::InvalidToken)?;

    let account = deps
        .accounts
        .find_by_id(claims.user_id)
        .await?
        .ok_or(OnboardingError::InvalidToken)?;

    // A superseded token no longer matches what login stored
    if account.refresh_token.as_deref() != Some(refresh_token) {
        return Err(OnboardingError::InvalidToken);
    }

    let subject = TokenSubject::for_account(&account);
    let access_token =
        deps.jwt_service
            .create_token(&subject, TokenKind::Access, deps.settings.access_token_ttl)?;

    info!(vendor_id = %account.id, role = %account.role, "Access token refreshed");

    Ok(RefreshResult { access_token })
}
