//! Verify OTP activity

use crate::common::OnboardingResult;
use crate::domains::registration::challenge;
use crate::domains::registration::identifier::ContactIdentifier;
use crate::domains::registration::types::OtpVerified;
use crate::kernel::ServerDeps;

/// Mark the contact's challenge verified. No account is touched.
pub async fn verify_otp(
    email: Option<&str>,
    phone: Option<&str>,
    code: &str,
    deps: &ServerDeps,
) -> OnboardingResult<OtpVerified> {
    let identifier = ContactIdentifier::from_contact(email, phone)?;
    let method = challenge::verify(&identifier, code, deps).await?;

    Ok(OtpVerified {
        identifier: identifier.value().to_string(),
        method,
    })
}
