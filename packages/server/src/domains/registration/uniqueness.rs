//! Identity uniqueness check against existing accounts.
//!
//! The unique indexes on `vendor_accounts` are the real guard; this check
//! fails early with a readable message.

use crate::common::{OnboardingError, OnboardingResult};
use crate::kernel::ServerDeps;

/// Fail `Conflict` if an account already holds either the email or the phone.
pub async fn assert_available(
    email: Option<&str>,
    phone: Option<&str>,
    deps: &ServerDeps,
) -> OnboardingResult<()> {
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    let phone = phone.map(str::trim).filter(|p| !p.is_empty());
    if email.is_none() && phone.is_none() {
        return Err(OnboardingError::invalid_input("email or phone is required"));
    }

    let Some(existing) = deps.accounts.find_by_contact(email, phone).await? else {
        return Ok(());
    };

    let email_taken = email.is_some_and(|e| existing.contact_details.email.eq_ignore_ascii_case(e));
    let message = if email_taken {
        "User with this email already exists"
    } else {
        "User with this phone number already exists"
    };
    Err(OnboardingError::Conflict(message.to_string()))
}

/// Map a unique-index rejection to the matching conflict message.
pub fn duplicate_conflict(field: &str) -> OnboardingError {
    let message = match field {
        "email" => "User with this email already exists",
        "phone_number" => "User with this phone number already exists",
        "gst_number" => "A vendor with this GST number already exists",
        _ => "User with these contact details already exists",
    };
    OnboardingError::Conflict(message.to_string())
}
