//! JWT issue and validation.

use crate::config::MIN_JWT_SECRET_LEN;
use crate::error::{AppError, AppResult};
use crate::models::AccessToken;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Access token lifetime.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // identity id
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| AppError::TokenInvalid(e.to_string()))
    }
}

/// HS256 token issuer keyed by the process-wide signing secret.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<Keys>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    /// Fails when the secret is absent or shorter than 32 bytes.
    pub fn new(secret: &str) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::Config("JWT secret is not set".to_string()));
        }
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret must be at least {} bytes",
                MIN_JWT_SECRET_LEN
            )));
        }
        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
        })
    }

    pub fn issue(&self, subject: Uuid, email: &str) -> AppResult<AccessToken> {
        self.issue_at(subject, email, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        subject: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AccessToken> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            iat,
            exp: (now + Duration::seconds(ACCESS_TOKEN_TTL_SECS)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("sign token: {}", e)))?;
        Ok(AccessToken {
            access_token: token,
        })
    }

    /// Check signature and expiry. Expired and malformed tokens are distinct errors.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid(e.to_string()),
            }
        })?;
        Ok(data.claims)
    }
}
