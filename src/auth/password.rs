//! Argon2id password hashing and verification.

use crate::config::HashConfig;
use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher as _,
        PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Salted, memory-hard password hasher. Output is a PHC string
/// (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`) carrying its own parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(config: HashConfig) -> AppResult<Self> {
        let params = config
            .params()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// Check `password` against `stored`. A mismatch is `Ok(false)`; an unreadable
    /// hash is `CorruptHash`. Parameters come from the stored hash, not from config.
    pub fn verify(&self, stored: &str, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(stored).map_err(|_| AppError::CorruptHash)?;
        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(_) => Err(AppError::CorruptHash),
        }
    }
}
