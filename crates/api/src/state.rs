use std::sync::Arc;

use voicepath_llm::TextGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: voicepath_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Text generator used for extraction, flowcharts and the assistant.
    pub llm: Arc<dyn TextGenerator>,
}
