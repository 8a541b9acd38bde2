//! Handler turning a voice transcription into stored tasks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use voicepath_core::extraction::parse_extracted_tasks;
use voicepath_core::types::DbId;
use voicepath_db::models::task::Task;
use voicepath_db::repositories::TaskRepo;
use voicepath_llm::{prompts, Purpose};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoiceTasksRequest {
    pub user_id: DbId,
    pub transcription: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceTasksResponse {
    pub tasks: Vec<Task>,
    pub message: String,
}

/// POST /api/v1/voice-tasks
pub async fn process(
    State(state): State<AppState>,
    Json(input): Json<VoiceTasksRequest>,
) -> AppResult<(StatusCode, Json<VoiceTasksResponse>)> {
    let transcription = input.transcription.trim();
    if transcription.is_empty() {
        return Err(AppError::BadRequest("transcription must not be empty".to_string()));
    }

    let prompt = prompts::task_extraction(transcription);
    let content = state.llm.generate(Purpose::Extraction, &prompt).await?;
    let extraction = parse_extracted_tasks(&content)?;

    for correction in &extraction.corrections {
        tracing::warn!(user_id = %input.user_id, %correction, "Defaulted extracted task field");
    }

    if extraction.tasks.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(VoiceTasksResponse {
                tasks: Vec::new(),
                message: "No clear tasks were identified in the transcription.".to_string(),
            }),
        ));
    }

    let tasks = TaskRepo::create_many(&state.pool, input.user_id, &extraction.tasks).await?;
    let count = tasks.len();
    tracing::info!(user_id = %input.user_id, count, "Tasks extracted from transcription");

    let message = format!("Successfully created {count} tasks from your voice note.");
    Ok((StatusCode::CREATED, Json(VoiceTasksResponse { tasks, message })))
}
