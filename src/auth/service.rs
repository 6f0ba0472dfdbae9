//! Credential service: signup and signin, each ending in exactly one token or one error.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::jwt::TokenIssuer;
use super::password::PasswordHasher;
use crate::db::{IdentityStore, StoreError};
use crate::error::{AppError, AppResult};
use crate::models::{AccessToken, Credential, Identity};

/// Password compared against on unknown emails so signin timing matches a real check.
const DECOY_PASSWORD: &str = "credgate-decoy-password";

/// Orchestrates hasher, identity store and token issuer.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn IdentityStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    decoy_hash: Arc<str>,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> AppResult<Self> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?.into();
        Ok(Self {
            store,
            hasher,
            tokens,
            decoy_hash,
        })
    }

    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Create a new identity and issue its first token.
    /// The store's uniqueness constraint decides collisions; no existence pre-check.
    #[instrument(skip(self, credential), fields(email = %credential.email))]
    pub async fn register(&self, credential: Credential) -> AppResult<AccessToken> {
        let Credential { email, password } = credential;
        let password_hash = self.hash_blocking(password).await?;

        let identity = match self.store.create(&email, &password_hash).await {
            Ok(identity) => identity,
            Err(StoreError::UniqueViolation) => {
                debug!("signup rejected: credentials taken");
                return Err(AppError::CredentialsTaken);
            }
            Err(StoreError::Db(e)) => {
                debug!(error = %e, "signup: identity store failed");
                return Err(AppError::Storage(e));
            }
        };

        info!(user_id = %identity.id, "identity registered");
        self.tokens.issue(identity.id, &identity.email)
    }

    /// Verify a returning identity and issue a token.
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    #[instrument(skip(self, credential), fields(email = %credential.email))]
    pub async fn login(&self, credential: Credential) -> AppResult<AccessToken> {
        let Credential { email, password } = credential;
        let found = self.store.find_by_email(&email).await?;

        let identity = match found {
            Some(identity) => identity,
            None => {
                self.verify_blocking(self.decoy_hash.to_string(), password)
                    .await?;
                debug!(reason = "unknown email", "signin rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let Identity {
            id,
            email,
            password_hash,
            ..
        } = identity;
        if !self.verify_blocking(password_hash, password).await? {
            debug!(reason = "password mismatch", "signin rejected");
            return Err(AppError::InvalidCredentials);
        }

        info!(user_id = %id, "signin succeeded");
        self.tokens.issue(id, &email)
    }

    async fn hash_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {}", e)))?
    }

    async fn verify_blocking(&self, stored: String, password: String) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&stored, &password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashConfig;
    use crate::db::MemoryIdentityStore;
    use async_trait::async_trait;
    use uuid::Uuid;

    const SECRET: &str = "test-jwt-secret-min-32-chars!!!!";

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn service_with(store: Arc<dyn IdentityStore>) -> CredentialService {
        CredentialService::new(store, fast_hasher(), TokenIssuer::new(SECRET).unwrap()).unwrap()
    }

    fn service() -> (CredentialService, MemoryIdentityStore) {
        let store = MemoryIdentityStore::new();
        (service_with(Arc::new(store.clone())), store)
    }

    struct FailingStore;

    #[async_trait]
    impl IdentityStore for FailingStore {
        async fn find_by_email(&self, _email: &str) -> Result<Option<Identity>, StoreError> {
            Err(StoreError::Db(sqlx::Error::PoolTimedOut))
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Identity>, StoreError> {
            Err(StoreError::Db(sqlx::Error::PoolTimedOut))
        }

        async fn create(&self, _email: &str, _hash: &str) -> Result<Identity, StoreError> {
            Err(StoreError::Db(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let (svc, store) = service();
        svc.register(Credential::new("a@x.com", "secret1"))
            .await
            .unwrap();
        let identity = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(identity.password_hash, "secret1");
        assert!(identity.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_then_login_scenario() {
        let (svc, store) = service();

        let first = svc
            .register(Credential::new("a@x.com", "secret1"))
            .await
            .unwrap();
        let first_claims = svc.tokens().verify(&first.access_token).unwrap();
        assert_eq!(first_claims.email, "a@x.com");
        let id = store.find_by_email("a@x.com").await.unwrap().unwrap().id;
        assert_eq!(first_claims.subject().unwrap(), id);

        let again = svc.register(Credential::new("a@x.com", "other")).await;
        assert!(matches!(again, Err(AppError::CredentialsTaken)));

        let wrong = svc.login(Credential::new("a@x.com", "wrong")).await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        let ok = svc
            .login(Credential::new("a@x.com", "secret1"))
            .await
            .unwrap();
        let claims = svc.tokens().verify(&ok.access_token).unwrap();
        assert_eq!(claims.subject().unwrap(), id);
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let (svc, _) = service();
        svc.register(Credential::new("a@x.com", "secret1"))
            .await
            .unwrap();

        let unknown = svc
            .login(Credential::new("nobody@x.com", "secret1"))
            .await
            .unwrap_err();
        let wrong = svc
            .login(Credential::new("a@x.com", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert_eq!(unknown.public_message(), wrong.public_message());
        assert_eq!(unknown.status(), wrong.status());
    }

    #[tokio::test]
    async fn concurrent_registrations_create_one_identity() {
        let (svc, store) = service();
        let attempts = (0..8).map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.register(Credential::new("race@x.com", format!("pw-{}", i)))
                    .await
            })
        });
        let results = futures::future::join_all(attempts).await;

        let mut ok = 0;
        let mut taken = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => ok += 1,
                Err(AppError::CredentialsTaken) => taken += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(taken, 7);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn store_failures_surface_as_storage_fault() {
        let svc = service_with(Arc::new(FailingStore));
        assert!(matches!(
            svc.register(Credential::new("a@x.com", "pw")).await,
            Err(AppError::Storage(_))
        ));
        assert!(matches!(
            svc.login(Credential::new("a@x.com", "pw")).await,
            Err(AppError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_not_a_mismatch() {
        let (svc, store) = service();
        store.create("bad@x.com", "garbage").await.unwrap();
        assert!(matches!(
            svc.login(Credential::new("bad@x.com", "pw")).await,
            Err(AppError::CorruptHash)
        ));
    }
}
