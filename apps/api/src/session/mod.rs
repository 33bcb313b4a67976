//! Session state: one `SessionRepository` seam with two backends, the
//! in-process `SessionCache` and the durable `FileTokenStore`.
//! `SessionTokenProvider` resolves a bearer token from them in that order.

pub mod cache;
pub mod handlers;
pub mod token_store;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::session::{PersistedSession, Token, UserIdentity};

pub use cache::SessionCache;
pub use token_store::FileTokenStore;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn get(&self) -> Option<PersistedSession>;
    async fn set(&self, session: &PersistedSession) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct SessionTokenProvider {
    cache: Arc<SessionCache>,
    store: Arc<dyn SessionRepository>,
}

impl SessionTokenProvider {
    pub fn new(cache: Arc<SessionCache>, store: Arc<dyn SessionRepository>) -> Self {
        Self { cache, store }
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Current session: cache first, then the durable store.
    /// A session restored from the store is copied into the cache.
    pub async fn current(&self) -> Option<PersistedSession> {
        if let Some(session) = self.cache.get().await.filter(|s| s.tokens.is_usable()) {
            return Some(session);
        }

        let stored = self.store.get().await.filter(|s| s.tokens.is_usable())?;
        if let Err(e) = self.cache.set(&stored).await {
            warn!("Failed to cache restored session: {e:#}");
        }
        info!("Restored tokens from file");
        Some(stored)
    }

    /// Resolves a usable bearer token or fails with `Unauthenticated`.
    /// No expiry check: a stale token surfaces as a downstream rejection.
    pub async fn get_token(&self) -> Result<Token, AppError> {
        self.current()
            .await
            .map(|s| s.tokens)
            .ok_or(AppError::Unauthenticated)
    }

    /// Persists a fresh login to both backends.
    pub async fn login(&self, token: Token, identity: UserIdentity) -> Result<()> {
        let session = PersistedSession::new(token, identity);
        self.cache.set(&session).await?;
        // File write is best-effort.
        if let Err(e) = self.store.set(&session).await {
            warn!("Error saving tokens: {e:#}");
        }
        Ok(())
    }

    pub async fn logout(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!("Error clearing session cache: {e:#}");
        }
        if let Err(e) = self.store.clear().await {
            warn!("Error deleting tokens file: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(access: &str) -> PersistedSession {
        PersistedSession::new(
            Token {
                access_token: access.into(),
                refresh_token: None,
                expires_in: 0,
                token_type: "bearer".into(),
                obtained_at: None,
            },
            UserIdentity::default(),
        )
    }

    fn build_provider(dir: &tempfile::TempDir) -> (SessionTokenProvider, Arc<FileTokenStore>) {
        let store = Arc::new(FileTokenStore::new(dir.path().join("stored_tokens.json")));
        (
            SessionTokenProvider::new(Arc::new(SessionCache::new()), store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn test_no_session_anywhere_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, _) = build_provider(&dir);
        assert!(matches!(
            provider.get_token().await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_cache_takes_precedence_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, store) = build_provider(&dir);
        store.set(&session("from-file")).await.unwrap();
        provider.cache().set(&session("from-cache")).await.unwrap();

        assert_eq!(provider.get_token().await.unwrap().access_token, "from-cache");
    }

    #[tokio::test]
    async fn test_file_session_is_restored_into_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, store) = build_provider(&dir);
        store.set(&session("from-file")).await.unwrap();

        assert_eq!(provider.get_token().await.unwrap().access_token, "from-file");
        assert_eq!(
            provider.cache().get().await.unwrap().tokens.access_token,
            "from-file"
        );
    }

    #[tokio::test]
    async fn test_empty_access_token_is_not_usable() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, store) = build_provider(&dir);
        store.set(&session("")).await.unwrap();

        assert!(matches!(
            provider.get_token().await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_both_backends() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, store) = build_provider(&dir);
        provider
            .login(session("abc").tokens, UserIdentity::default())
            .await
            .unwrap();
        provider.cache().mark_unlocked("r1").await;

        provider.logout().await;

        assert!(store.load().await.is_none());
        assert!(provider.cache().get().await.is_none());
        assert!(!provider.cache().is_unlocked("r1").await);
    }
}
