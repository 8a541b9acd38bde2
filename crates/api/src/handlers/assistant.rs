//! Handlers for the productivity assistant.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use voicepath_core::progress::format_breakdown_text;
use voicepath_core::types::DbId;
use voicepath_llm::{prompts, Purpose};

use crate::error::{AppError, AppResult};
use crate::handlers::export::load_breakdown;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub prompt: String,
    /// When set, the task's breakdown is included as context.
    pub task_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub response: String,
}

/// POST /api/v1/assistant
pub async fn ask(
    State(state): State<AppState>,
    Json(input): Json<AssistantRequest>,
) -> AppResult<Json<AssistantResponse>> {
    if input.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt is required".to_string()));
    }

    let breakdown = match input.task_id {
        Some(task_id) => Some(format_breakdown_text(&load_breakdown(&state, task_id).await?)),
        None => None,
    };

    let prompt = prompts::assistant(&input.prompt, breakdown.as_deref());
    let response = state.llm.generate(Purpose::Assistant, &prompt).await?;
    tracing::debug!(task_id = ?input.task_id, response_len = response.len(), "Assistant answered");

    Ok(Json(AssistantResponse { response }))
}

#[derive(Debug, Deserialize)]
pub struct StepContextRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub request: String,
}

#[derive(Debug, Serialize)]
pub struct StepContextResponse {
    /// Replacement description for the step.
    pub description: String,
}

/// POST /api/v1/assistant/context
pub async fn add_context(
    State(state): State<AppState>,
    Json(input): Json<StepContextRequest>,
) -> AppResult<Json<StepContextResponse>> {
    if input.request.trim().is_empty() {
        return Err(AppError::BadRequest("request is required".to_string()));
    }

    let prompt = prompts::step_context(&input.title, &input.description, input.request.trim());
    let description = state.llm.generate(Purpose::Assistant, &prompt).await?;
    Ok(Json(StepContextResponse { description }))
}
