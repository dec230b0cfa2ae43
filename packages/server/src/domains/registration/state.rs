use serde::Serialize;

use crate::domains::registration::models::VerificationChallenge;

/// Where a contact stands in registration.
///
/// Issuing a new challenge re-enters `Challenged` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    Unstarted,
    Challenged,
    Verified,
    Completed,
}

impl RegistrationState {
    /// Derive the state from what the stores hold for one contact.
    ///
    /// An expired challenge counts as no challenge.
    pub fn derive(
        challenge: Option<&VerificationChallenge>,
        account_exists: bool,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if account_exists {
            return Self::Completed;
        }
        match challenge {
            Some(c) if c.is_expired(now) => Self::Unstarted,
            Some(c) if c.verified => Self::Verified,
            Some(_) => Self::Challenged,
            None => Self::Unstarted,
        }
    }
}
