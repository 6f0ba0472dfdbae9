//! Data models: identities, credentials, and issued tokens.

pub mod credential;
pub mod identity;

pub use credential::*;
pub use identity::*;
