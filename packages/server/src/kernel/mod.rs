// Kernel - infrastructure traits, adapters and the dependency container

pub mod brevo_client;
pub mod deps;
pub mod housekeeping;
pub mod password;
pub mod test_dependencies;
pub mod traits;

pub use brevo_client::BrevoEmailAdapter;
pub use deps::{
    AuthSettings, PostgresAccountStore, PostgresChallengeStore, RandomOtpGenerator, ServerDeps,
    SystemClock, TwilioSmsAdapter,
};
pub use housekeeping::{reap_expired_challenges, start_challenge_reaper};
pub use password::{BcryptHasher, MIN_BCRYPT_COST};
pub use test_dependencies::TestDependencies;
pub use traits::*;
