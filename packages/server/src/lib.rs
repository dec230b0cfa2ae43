// Vendor Onboarding - API Core
//
// Backend for OTP-verified vendor registration and role-based session tokens.
// Domains hold the business logic; kernel/ holds the infrastructure seams.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
