//! Application configuration loaded from environment.

use std::net::SocketAddr;

/// Minimum accepted length (bytes) of the token signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL. `None` runs with the in-memory identity store.
    pub database_url: Option<String>,
    /// JWT signing secret (min 32 bytes). Required.
    pub jwt_secret: String,
    /// Argon2id work factors for new password hashes.
    pub hash: HashConfig,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

/// Argon2id work factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashConfig {
    /// Build argon2 parameters, rejecting combinations argon2 refuses.
    pub fn params(&self) -> Result<argon2::Params, ConfigLoadError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| ConfigLoadError::InvalidHashParams(e.to_string()))
    }
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigLoadError::MissingJwtSecret)?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigLoadError::WeakJwtSecret);
        }

        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: parse_u32(&lookup, "HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_u32(&lookup, "HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_u32(&lookup, "HASH_PARALLELISM", defaults.parallelism)?,
        };
        hash.params()?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            database_url,
            jwt_secret,
            hash,
            log_level,
        })
    }
}

fn parse_u32<F>(lookup: &F, key: &str, default: u32) -> Result<u32, ConfigLoadError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigLoadError::InvalidHashParams(format!("{} is not a number", key))),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("JWT_SECRET is not set")]
    MissingJwtSecret,
    #[error("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_LEN)]
    WeakJwtSecret,
    #[error("Invalid password hash parameters: {0}")]
    InvalidHashParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigLoadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();
        assert_eq!(config.server_addr.port(), 3000);
        assert!(config.database_url.is_none());
        assert_eq!(config.hash, HashConfig::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn missing_secret_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigLoadError::MissingJwtSecret)));
        assert!(matches!(
            load(&[("JWT_SECRET", "")]),
            Err(ConfigLoadError::MissingJwtSecret)
        ));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            load(&[("JWT_SECRET", "too-short")]),
            Err(ConfigLoadError::WeakJwtSecret)
        ));
    }

    #[test]
    fn hash_params_are_read_and_checked() {
        let config = load(&[
            ("JWT_SECRET", SECRET),
            ("HASH_MEMORY_KIB", "65536"),
            ("HASH_ITERATIONS", "3"),
            ("HASH_PARALLELISM", "2"),
        ])
        .unwrap();
        assert_eq!(config.hash.memory_kib, 65536);
        assert_eq!(config.hash.iterations, 3);
        assert_eq!(config.hash.parallelism, 2);

        assert!(matches!(
            load(&[("JWT_SECRET", SECRET), ("HASH_ITERATIONS", "0")]),
            Err(ConfigLoadError::InvalidHashParams(_))
        ));
        assert!(matches!(
            load(&[("JWT_SECRET", SECRET), ("HASH_MEMORY_KIB", "lots")]),
            Err(ConfigLoadError::InvalidHashParams(_))
        ));
    }

    #[test]
    fn invalid_server_addr() {
        assert!(matches!(
            load(&[("JWT_SECRET", SECRET), ("SERVER_ADDR", "nope")]),
            Err(ConfigLoadError::InvalidServerAddr)
        ));
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        let config = load(&[("JWT_SECRET", SECRET), ("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }
}
