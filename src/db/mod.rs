//! Identity store: trait plus PostgreSQL and in-memory implementations.

mod memory;
mod pool;
mod repositories;

pub use memory::MemoryIdentityStore;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repositories::PgIdentityStore;

use crate::error::AppError;
use crate::models::Identity;
use async_trait::async_trait;
use uuid::Uuid;

/// Failure modes of the identity store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the insert.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation => AppError::CredentialsTaken,
            StoreError::Db(e) => AppError::Storage(e),
        }
    }
}

/// Persistence keyed by email. `create` must enforce email uniqueness atomically.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;

    async fn create(&self, email: &str, password_hash: &str) -> Result<Identity, StoreError>;
}
