pub mod verification_challenge;

pub use verification_challenge::VerificationChallenge;
