use std::sync::Arc;

use authorly_llm::LlmProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: authorly_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// The configured LLM provider, if one could be constructed at startup.
    /// `None` means generation endpoints answer 503.
    pub llm: Option<Arc<dyn LlmProvider>>,
}
