//! Complete registration activity

use tracing::info;

use crate::common::{OnboardingError, OnboardingResult, Role, VendorId, VendorStatus};
use crate::domains::registration::challenge;
use crate::domains::registration::types::RegistrationSubmission;
use crate::domains::registration::uniqueness::{assert_available, duplicate_conflict};
use crate::domains::vendor::models::{InsertOutcome, VendorAccount, VendorProfile};
use crate::kernel::ServerDeps;

/// Create the vendor account for a verified contact.
///
/// The account is written in one insert, and the challenge is only consumed
/// after that insert succeeds, so a failed completion can be retried without
/// a new OTP.
pub async fn complete_registration(
    submission: RegistrationSubmission,
    deps: &ServerDeps,
) -> OnboardingResult<VendorProfile> {
    let company_info = submission.company_info.normalized()?;
    let contact_details = submission.contact_details.normalized()?;
    let address = submission.address.normalized()?;

    if submission.password.trim().is_empty() {
        return Err(OnboardingError::invalid_input("password is required"));
    }
    let role = resolve_role(submission.role, deps.settings.allow_admin_self_registration)?;

    let verified = challenge::find_verified(
        &contact_details.email,
        &contact_details.phone_number,
        deps,
    )
    .await?;

    assert_available(
        Some(&contact_details.email),
        Some(&contact_details.phone_number),
        deps,
    )
    .await?;

    let documents = submission.documents;
    if documents.gst_certificate.is_none() {
        return Err(OnboardingError::MissingDocument("GstCertificate"));
    }
    if documents.pan_card.is_none() {
        return Err(OnboardingError::MissingDocument("PanCard"));
    }

    let password_hash = deps.password_hasher.hash(&submission.password).await?;

    let now = deps.clock.now();
    let account = VendorAccount {
        id: VendorId::new(),
        company_info,
        contact_details,
        address,
        documents,
        password_hash,
        role,
        status: VendorStatus::Pending,
        email_verified: true,
        refresh_token: None,
        products: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let account = match deps.accounts.insert(&account).await? {
        InsertOutcome::Created(account) => account,
        InsertOutcome::Duplicate(field) => return Err(duplicate_conflict(field)),
    };

    challenge::consume_on_completion(&verified.identifier, deps).await?;

    info!(
        vendor_id = %account.id,
        role = %account.role,
        identifier = %verified.identifier,
        "Vendor registration completed"
    );

    Ok(account.into())
}

fn resolve_role(declared: Option<Role>, allow_admin: bool) -> OnboardingResult<Role> {
    match declared.unwrap_or_default() {
        Role::SuperAdmin if !allow_admin => Err(OnboardingError::invalid_input(
            "super_admin accounts cannot be self-registered",
        )),
        role => Ok(role),
    }
}
