use serde::Serialize;

use crate::common::{OnboardingError, OnboardingResult, VerificationMethod};
use crate::domains::vendor::models::{is_plausible_email, normalize_email, normalize_phone};

/// The contact a challenge is keyed by: normalized email or phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "identifier", rename_all = "snake_case")]
pub enum ContactIdentifier {
    Email(String),
    #[serde(rename = "sms")]
    Phone(String),
}

impl ContactIdentifier {
    /// Email wins when both are supplied; blank values count as absent.
    pub fn from_contact(email: Option<&str>, phone: Option<&str>) -> OnboardingResult<Self> {
        let email = email.map(normalize_email).filter(|e| !e.is_empty());
        let phone = phone.map(normalize_phone).filter(|p| !p.is_empty());

        match (email, phone) {
            (Some(email), _) => {
                if !is_plausible_email(&email) {
                    return Err(OnboardingError::invalid_input("email must be a valid email address"));
                }
                Ok(Self::Email(email))
            }
            (None, Some(phone)) => Ok(Self::Phone(phone)),
            (None, None) => Err(OnboardingError::invalid_input("email or phone is required")),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Email(v) | Self::Phone(v) => v,
        }
    }

    pub fn method(&self) -> VerificationMethod {
        match self {
            Self::Email(_) => VerificationMethod::Email,
            Self::Phone(_) => VerificationMethod::Sms,
        }
    }
}
