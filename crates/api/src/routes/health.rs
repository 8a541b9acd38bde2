//! Root-level liveness route. Mounted outside `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether a Gemini API key is set. Task capture, flowcharts and the
    /// assistant answer 500 without one.
    pub llm_configured: bool,
    pub extraction_model: String,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = voicepath_db::health_check(&state.pool).await.is_ok();
    let llm = &state.config.llm;

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        llm_configured: llm.api_key.is_some(),
        extraction_model: llm.models.extraction.clone(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
