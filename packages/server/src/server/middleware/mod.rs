// HTTP middleware
pub mod access_policy;
pub mod jwt_auth;

pub use access_policy::*;
pub use jwt_auth::*;
