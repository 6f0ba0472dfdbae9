//! Authentication: password hashing, token issuance, signup/signin.

mod handlers;
mod jwt;
mod password;
mod service;

pub use handlers::{login, register};
pub use jwt::{Claims, TokenIssuer, ACCESS_TOKEN_TTL_SECS};
pub use password::PasswordHasher;
pub use service::CredentialService;
