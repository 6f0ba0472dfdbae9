//! In-memory identity store for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IdentityStore, StoreError};
use crate::models::Identity;

/// Identities keyed by email; check-and-insert happens under one write lock.
#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    by_email: Arc<RwLock<HashMap<String, Identity>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.by_email.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.by_email.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.by_email.read().await.get(email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .by_email
            .read()
            .await
            .values()
            .find(|identity| identity.id == id)
            .cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<Identity, StoreError> {
        let mut by_email = self.by_email.write().await;
        if by_email.contains_key(email) {
            return Err(StoreError::UniqueViolation);
        }
        let identity = Identity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        by_email.insert(email.to_string(), identity.clone());
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_find() {
        let store = MemoryIdentityStore::new();
        let created = store.create("a@x.com", "$argon2id$stub").await.unwrap();
        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let store = MemoryIdentityStore::new();
        store.create("a@x.com", "h1").await.unwrap();
        assert!(matches!(
            store.create("a@x.com", "h2").await,
            Err(StoreError::UniqueViolation)
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn email_is_case_sensitive() {
        let store = MemoryIdentityStore::new();
        store.create("a@x.com", "h1").await.unwrap();
        store.create("A@x.com", "h2").await.unwrap();
        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());
    }
}
