use std::sync::Arc;

use crate::llm_client::ModelClient;
use crate::sessions::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: ModelClient,
    /// Pluggable store. Default: InMemoryStore.
    pub store: Arc<dyn AnalysisStore>,
}
