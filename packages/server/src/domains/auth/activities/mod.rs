//! Auth domain activities - credential login and token refresh

mod login;
mod refresh;

pub use login::{login, LoginIdentifier};
pub use refresh::refresh;
