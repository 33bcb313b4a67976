use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::session::PersistedSession;
use crate::session::SessionRepository;

/// In-process session state for the single operator: the active token plus
/// the resumes whose contacts were paid-unlocked during this session.
#[derive(Debug, Default)]
pub struct SessionCache {
    session: RwLock<Option<PersistedSession>>,
    unlocked: RwLock<HashSet<String>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark_unlocked(&self, resume_id: &str) {
        self.unlocked.write().await.insert(resume_id.to_string());
    }

    pub async fn is_unlocked(&self, resume_id: &str) -> bool {
        self.unlocked.read().await.contains(resume_id)
    }
}

#[async_trait]
impl SessionRepository for SessionCache {
    async fn get(&self) -> Option<PersistedSession> {
        self.session.read().await.clone()
    }

    async fn set(&self, session: &PersistedSession) -> Result<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.write().await = None;
        self.unlocked.write().await.clear();
        Ok(())
    }
}
