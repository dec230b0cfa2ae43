//! OTP challenge store operations: issue, verify, consume.

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::common::{OnboardingError, OnboardingResult, VerificationMethod};
use crate::domains::registration::identifier::ContactIdentifier;
use crate::domains::registration::models::VerificationChallenge;
use crate::domains::registration::notifications;
use crate::domains::registration::state::RegistrationState;
use crate::kernel::ServerDeps;

/// A freshly issued challenge. The code is only ever handed to the notifier.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub identifier: ContactIdentifier,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a code, upsert the challenge and deliver the code.
///
/// On delivery failure the challenge is deleted again, unless a later issue
/// already replaced its code, and `DeliveryFailed` returned; the caller may
/// simply issue again.
pub async fn issue(identifier: &ContactIdentifier, deps: &ServerDeps) -> OnboardingResult<IssuedChallenge> {
    let code = deps.otp_generator.generate();
    let challenge = VerificationChallenge::new(
        identifier.value().to_string(),
        code.clone(),
        identifier.method(),
        deps.clock.now(),
        deps.settings.otp_ttl,
    );
    let stored = deps.challenges.upsert(&challenge).await?;

    if let Err(e) = deliver(identifier, &code, deps).await {
        if let Err(cleanup) = deps.challenges.delete_if_code(identifier.value(), &code).await {
            error!(
                identifier = identifier.value(),
                "Failed to remove undeliverable challenge: {}", cleanup
            );
        }
        return Err(e);
    }

    info!(
        identifier = identifier.value(),
        method = %identifier.method(),
        "Verification challenge issued"
    );

    Ok(IssuedChallenge {
        identifier: identifier.clone(),
        code,
        expires_at: stored.expires_at,
    })
}

async fn deliver(identifier: &ContactIdentifier, code: &str, deps: &ServerDeps) -> OnboardingResult<()> {
    let ttl_minutes = deps.settings.otp_ttl.num_minutes();
    let limit = deps.settings.external_call_timeout;

    let (channel, outcome) = match identifier {
        ContactIdentifier::Email(to) => {
            let message = notifications::otp_email(to, code, ttl_minutes);
            ("email", timeout(limit, deps.email.send(&message)).await)
        }
        ContactIdentifier::Phone(to) => {
            let body = notifications::otp_sms(code, ttl_minutes);
            ("sms", timeout(limit, deps.sms.send(to, &body)).await)
        }
    };

    let reason = match outcome {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {}s", limit.as_secs()),
    };
    warn!(identifier = identifier.value(), channel, "OTP delivery failed: {}", reason);
    Err(OnboardingError::DeliveryFailed { channel, reason })
}

/// Check `code` against the stored challenge and mark it verified.
///
/// Order: missing, wrong code, expired (deleted), already verified.
pub async fn verify(
    identifier: &ContactIdentifier,
    code: &str,
    deps: &ServerDeps,
) -> OnboardingResult<VerificationMethod> {
    if code.is_empty() {
        return Err(OnboardingError::invalid_input("otp is required"));
    }

    let key = identifier.value();
    let Some(challenge) = deps.challenges.find(key).await? else {
        return Err(not_found());
    };
    if challenge.code != code {
        return Err(OnboardingError::CodeMismatch);
    }

    let now = deps.clock.now();
    if challenge.is_expired(now) {
        deps.challenges.delete(key).await?;
        return Err(OnboardingError::Expired);
    }
    if challenge.verified {
        return Err(OnboardingError::AlreadyVerified);
    }

    match deps.challenges.mark_verified(key, code, now).await? {
        Some(verified) => {
            info!(identifier = key, method = %verified.method, "Verification challenge verified");
            Ok(verified.method)
        }
        // Lost a race: another verify won, or a re-issue replaced the code
        None => match deps.challenges.find(key).await? {
            Some(current) if current.code == code && current.verified => {
                Err(OnboardingError::AlreadyVerified)
            }
            Some(_) => Err(OnboardingError::CodeMismatch),
            None => Err(not_found()),
        },
    }
}

/// Find the verified, unexpired challenge for a completing registration.
///
/// Tries the email first, then the phone. Expired challenges met on the way
/// are deleted.
pub async fn find_verified(
    email: &str,
    phone: &str,
    deps: &ServerDeps,
) -> OnboardingResult<VerificationChallenge> {
    let now = deps.clock.now();
    for key in [email, phone] {
        let Some(challenge) = deps.challenges.find(key).await? else {
            continue;
        };
        match RegistrationState::derive(Some(&challenge), false, now) {
            RegistrationState::Verified => return Ok(challenge),
            RegistrationState::Unstarted => {
                deps.challenges.delete(key).await?;
            }
            _ => {}
        }
    }
    Err(OnboardingError::NotVerified)
}

/// Drop the challenge once its account exists.
pub async fn consume_on_completion(identifier: &str, deps: &ServerDeps) -> OnboardingResult<()> {
    if !deps.challenges.delete(identifier).await? {
        warn!(identifier, "Challenge already gone at completion");
    }
    Ok(())
}

fn not_found() -> OnboardingError {
    OnboardingError::NotFound("Email not found or OTP expired".to_string())
}
