//! Login and refresh endpoints. Tokens travel as http-only cookies.

use axum::extract::rejection::JsonRejection;
use axum::{extract::Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{OnboardingError, Role};
use crate::domains::auth::activities;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{ACCESS_COOKIE, REFRESH_COOKIE};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address or phone number
    #[serde(alias = "identifier", alias = "phone")]
    pub email: String,
    pub password: String,
}

/// POST /api/admin/auth/login
pub async fn admin_login_handler(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let Json(body) = payload.map_err(|e| OnboardingError::invalid_input(e.body_text()))?;
    let result =
        activities::login(&body.email, &body.password, Role::SuperAdmin, &state.deps).await?;

    let jar = jar
        .add(state.access_cookie(result.access_token.clone()))
        .add(state.refresh_cookie(result.refresh_token.clone()));
    Ok((jar, Json(json!({ "user": result.user }))))
}

/// POST /api/vendor/auth/login
pub async fn vendor_login_handler(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let Json(body) = payload.map_err(|e| OnboardingError::invalid_input(e.body_text()))?;
    let result = activities::login(&body.email, &body.password, Role::Vendor, &state.deps).await?;

    let jar = jar
        .add(state.access_cookie(result.access_token.clone()))
        .add(state.refresh_cookie(result.refresh_token.clone()));
    Ok((
        jar,
        Json(json!({ "status": result.user.status, "user": result.user })),
    ))
}

/// POST /api/auth/refresh
pub async fn refresh_handler(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let Some(refresh_token) = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()) else {
        return Err(OnboardingError::InvalidToken.into());
    };

    let result = activities::refresh(&refresh_token, &state.deps).await?;

    let jar = jar.add(state.access_cookie(result.access_token.clone()));
    Ok((
        jar,
        Json(json!({ "status": "success", "accessToken": result.access_token })),
    ))
}

impl AppState {
    fn session_cookie(&self, name: &'static str, value: String, ttl: chrono::Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .path("/")
            .max_age(time::Duration::seconds(ttl.num_seconds()))
            .build()
    }

    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        self.session_cookie(ACCESS_COOKIE, token, self.deps.settings.access_token_ttl)
    }

    pub fn refresh_cookie(&self, token: String) -> Cookie<'static> {
        self.session_cookie(REFRESH_COOKIE, token, self.deps.settings.refresh_token_ttl)
    }
}
