// HTTP routes
pub mod auth;
pub mod health;
pub mod vendors;

pub use auth::*;
pub use health::*;
pub use vendors::*;
