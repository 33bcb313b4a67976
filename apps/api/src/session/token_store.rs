//! Durable single-record session file: `{tokens, userInfo, savedAt}`.
//!
//! One slot, overwritten wholesale. Single writer (one server process);
//! there is no locking.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::session::{PersistedSession, Token, UserIdentity};
use crate::session::SessionRepository;

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `None` on a missing file or any read/parse failure. Never errors.
    pub async fn load(&self) -> Option<PersistedSession> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Error loading stored tokens from {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Stored tokens at {} are unreadable: {e}", self.path.display());
                None
            }
        }
    }

    /// Overwrites the whole record and stamps the current time.
    pub async fn save(&self, token: &Token, identity: &UserIdentity) -> Result<PersistedSession> {
        let session = PersistedSession::new(token.clone(), identity.clone());
        let body = serde_json::to_string_pretty(&session).context("serialize session")?;
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        info!("Tokens saved to {}", self.path.display());
        Ok(session)
    }

    /// Removes the record. A missing file is not an error.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("delete {}", self.path.display())),
        }
    }
}

#[async_trait]
impl SessionRepository for FileTokenStore {
    async fn get(&self) -> Option<PersistedSession> {
        self.load().await
    }

    async fn set(&self, session: &PersistedSession) -> Result<()> {
        self.save(&session.tokens, &session.user_info).await.map(|_| ())
    }

    async fn clear(&self) -> Result<()> {
        FileTokenStore::clear(self).await
    }
}
