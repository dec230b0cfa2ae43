//! Maps onboarding errors to structured HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::common::OnboardingError;

/// Wrapper so handlers can `?` domain results straight into a response
#[derive(Debug)]
pub struct ApiError(pub OnboardingError);

impl<E> From<E> for ApiError
where
    E: Into<OnboardingError>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            OnboardingError::InvalidInput(_)
            | OnboardingError::MissingDocument(_)
            | OnboardingError::CodeMismatch
            | OnboardingError::Expired
            | OnboardingError::NotVerified => StatusCode::BAD_REQUEST,
            OnboardingError::Conflict(_) | OnboardingError::AlreadyVerified => StatusCode::CONFLICT,
            OnboardingError::NotFound(_) => StatusCode::NOT_FOUND,
            OnboardingError::InvalidCredentials | OnboardingError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            OnboardingError::RoleMismatch | OnboardingError::Forbidden(_) => StatusCode::FORBIDDEN,
            OnboardingError::DeliveryFailed { .. } => StatusCode::BAD_GATEWAY,
            OnboardingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            OnboardingError::Internal(e) => {
                tracing::error!(error = ?e, "Request failed with internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = serde_json::json!({
            "success": false,
            "error": {
                "kind": self.0.kind(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (OnboardingError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (OnboardingError::MissingDocument("PanCard"), StatusCode::BAD_REQUEST),
            (OnboardingError::NotVerified, StatusCode::BAD_REQUEST),
            (OnboardingError::Conflict("taken".into()), StatusCode::CONFLICT),
            (OnboardingError::AlreadyVerified, StatusCode::CONFLICT),
            (OnboardingError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (OnboardingError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (OnboardingError::InvalidToken, StatusCode::UNAUTHORIZED),
            (OnboardingError::RoleMismatch, StatusCode::FORBIDDEN),
            (OnboardingError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (
                OnboardingError::DeliveryFailed {
                    channel: "email",
                    reason: "down".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                OnboardingError::Internal(anyhow::anyhow!("db")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let response =
            ApiError(OnboardingError::Internal(anyhow::anyhow!("connection refused"))).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["kind"], "internal");
        assert_eq!(body["error"]["message"], "Internal server error");
    }
}
