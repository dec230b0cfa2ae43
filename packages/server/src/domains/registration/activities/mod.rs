//! Registration activities - start, verify, complete

mod complete_registration;
mod start_registration;
mod verify_otp;

pub use complete_registration::complete_registration;
pub use start_registration::start_registration;
pub use verify_otp::verify_otp;
