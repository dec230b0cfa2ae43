//! Start registration activity

use crate::common::OnboardingResult;
use crate::domains::registration::challenge;
use crate::domains::registration::identifier::ContactIdentifier;
use crate::domains::registration::types::RegistrationStarted;
use crate::domains::registration::uniqueness::assert_available;
use crate::kernel::ServerDeps;

/// Check the contact is free, then issue (or re-issue) a challenge for it.
pub async fn start_registration(
    email: Option<&str>,
    phone: Option<&str>,
    deps: &ServerDeps,
) -> OnboardingResult<RegistrationStarted> {
    let identifier = ContactIdentifier::from_contact(email, phone)?;
    assert_available(email, phone, deps).await?;

    let issued = challenge::issue(&identifier, deps).await?;

    Ok(RegistrationStarted {
        identifier: issued.identifier.value().to_string(),
        method: issued.identifier.method(),
        expires_at: issued.expires_at,
    })
}
