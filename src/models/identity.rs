//! Identity record owned by the identity store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user. `password_hash` is only ever produced by the password hasher.
#[derive(Debug, Clone, FromRow)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of an identity (never carries the hash).
#[derive(Debug, Clone, Serialize)]
pub struct IdentityInfo {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

impl From<&Identity> for IdentityInfo {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.clone(),
            created_at: identity.created_at.to_rfc3339(),
        }
    }
}
