//! Auth domain - credential login, session tokens and the access policy gate
//!
//! Responsibilities:
//! - Password login per role, issuing access + refresh tokens
//! - Refresh-token exchange against the single stored session
//! - Request-time authorization over (principal, route policy)

pub mod activities;
pub mod jwt;
pub mod policy;
pub mod types;

pub use jwt::{Claims, JwtService, TokenKind, TokenSubject};
pub use policy::{authorize, Principal, RoutePolicy};
pub use types::{LoginResult, RefreshResult};
