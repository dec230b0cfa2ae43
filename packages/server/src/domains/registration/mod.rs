//! Registration domain - OTP-verified vendor onboarding
//!
//! Unstarted -> Challenged -> Verified -> Completed, coordinating the
//! ephemeral challenge store with the durable account store.

pub mod activities;
pub mod challenge;
pub mod identifier;
pub mod models;
pub mod notifications;
pub mod state;
pub mod types;
pub mod uniqueness;

pub use identifier::ContactIdentifier;
pub use state::RegistrationState;
pub use types::{OtpVerified, RegistrationStarted, RegistrationSubmission};
