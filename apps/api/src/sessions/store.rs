//! Analysis Store: pluggable persistence for sessions and analysis records.
//!
//! Default: `InMemoryStore` (process-lifetime maps, lost on restart).
//! `AppState` holds an `Arc<dyn AnalysisStore>`, so a cache- or table-backed store
//! can be swapped in at startup without touching handlers.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::analysis::AnalysisRecord;
use crate::models::session::SessionRecord;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn put_session(&self, session: SessionRecord) -> Result<()>;

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    /// Appends an analysis id to a session. Returns `false` if the session is unknown.
    async fn append_analysis(&self, session_id: &str, analysis_id: &str) -> Result<bool>;

    async fn put_analysis(&self, record: AnalysisRecord) -> Result<()>;

    async fn get_analysis(&self, analysis_id: &str) -> Result<Option<AnalysisRecord>>;
}

#[derive(Default)]
pub struct InMemoryStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    analyses: RwLock<HashMap<String, AnalysisRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn put_session(&self, session: SessionRecord) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn append_analysis(&self, session_id: &str, analysis_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.analyses.push(analysis_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn put_analysis(&self, record: AnalysisRecord) -> Result<()> {
        self.analyses
            .write()
            .await
            .insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_analysis(&self, analysis_id: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self.analyses.read().await.get(analysis_id).cloned())
    }
}
