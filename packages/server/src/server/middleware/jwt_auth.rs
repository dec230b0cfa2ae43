use crate::domains::auth::{JwtService, Principal, TokenKind};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::{middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Cookie carrying the access token
pub const ACCESS_COOKIE: &str = "jwt";
/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// JWT authentication middleware
///
/// Reads the access token from the `jwt` cookie, falling back to an
/// `Authorization: Bearer` header, and adds the Principal to request extensions.
/// If no token or invalid token, request continues without a Principal; gated
/// routes reject it later.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(principal) = extract_principal(request.headers(), &jwt_service) {
        debug!(
            "Authenticated principal: {} (role: {})",
            principal.user_id, principal.role
        );
        request.extensions_mut().insert(principal);
    } else {
        debug!("No valid access token");
    }

    next.run(request).await
}

/// Extract and verify the access token from request headers
///
/// The cookie is tried first; a cookie token that fails verification falls
/// through to the Bearer header.
fn extract_principal(headers: &HeaderMap, jwt_service: &JwtService) -> Option<Principal> {
    let cookie_token = CookieJar::from_headers(headers)
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string());

    [cookie_token, bearer_token_from(headers)]
        .into_iter()
        .flatten()
        .find_map(|token| jwt_service.verify_token(&token, TokenKind::Access).ok())
        .map(Principal::from)
}

fn bearer_token_from(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
