use thiserror::Error;

/// Failures surfaced by onboarding and authentication operations.
///
/// Every variant reaches the HTTP boundary with a stable `kind()`; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid OTP")]
    CodeMismatch,

    #[error("OTP expired")]
    Expired,

    #[error("Contact has not been verified")]
    NotVerified,

    #[error("OTP already verified")]
    AlreadyVerified,

    #[error("Missing required document: {0}")]
    MissingDocument(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid role for this endpoint")]
    RoleMismatch,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("Failed to deliver OTP via {channel}: {reason}")]
    DeliveryFailed {
        channel: &'static str,
        reason: String,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl OnboardingError {
    /// Stable machine-readable kind for API clients
    pub fn kind(&self) -> &'static str {
        match self {
            OnboardingError::InvalidInput(_) => "invalid_input",
            OnboardingError::Conflict(_) => "conflict",
            OnboardingError::NotFound(_) => "not_found",
            OnboardingError::CodeMismatch => "code_mismatch",
            OnboardingError::Expired => "expired",
            OnboardingError::NotVerified => "not_verified",
            OnboardingError::AlreadyVerified => "already_verified",
            OnboardingError::MissingDocument(_) => "missing_document",
            OnboardingError::InvalidCredentials => "invalid_credentials",
            OnboardingError::RoleMismatch => "role_mismatch",
            OnboardingError::InvalidToken => "invalid_token",
            OnboardingError::Forbidden(_) => "forbidden",
            OnboardingError::DeliveryFailed { .. } => "delivery_failed",
            OnboardingError::Internal(_) => "internal",
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        OnboardingError::InvalidInput(message.into())
    }
}

impl From<sqlx::Error> for OnboardingError {
    fn from(e: sqlx::Error) -> Self {
        OnboardingError::Internal(e.into())
    }
}

pub type OnboardingResult<T> = Result<T, OnboardingError>;
