//! Handlers for subtasks (persisted steps of a task breakdown).

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use voicepath_core::error::CoreError;
use voicepath_core::steps::{duplicate_step_ids, Step, MAX_STEPS_PER_FLOW};
use voicepath_core::types::DbId;
use voicepath_db::models::subtask::{Subtask, UpdateSubtask};
use voicepath_db::repositories::SubtaskRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::task::load_task;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tasks/{id}/subtasks
pub async fn list_by_task(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Subtask>>>> {
    load_task(&state, task_id).await?;
    let subtasks = SubtaskRepo::list_by_task(&state.pool, task_id).await?;
    Ok(Json(DataResponse { data: subtasks }))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSubtasksRequest {
    pub steps: Vec<Step>,
}

/// PUT /api/v1/tasks/{id}/subtasks
///
/// Replaces every subtask with the given steps in order; step titles become
/// subtask names. An empty list clears the breakdown.
pub async fn replace(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<ReplaceSubtasksRequest>,
) -> AppResult<Json<DataResponse<Vec<Subtask>>>> {
    if input.steps.len() > MAX_STEPS_PER_FLOW {
        return Err(AppError::BadRequest(format!(
            "{} steps exceed the maximum of {MAX_STEPS_PER_FLOW}",
            input.steps.len()
        )));
    }
    let duplicates = duplicate_step_ids(&input.steps);
    if !duplicates.is_empty() {
        tracing::warn!(%task_id, ?duplicates, "Replacing subtasks from steps with duplicate ids");
    }

    let names = input
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| match step.title.trim() {
            "" => Err(CoreError::Validation(format!("step {} has an empty title", i + 1))),
            title => Ok(title.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    load_task(&state, task_id).await?;
    let subtasks = SubtaskRepo::replace_for_task(&state.pool, task_id, &names).await?;
    tracing::info!(%task_id, count = subtasks.len(), "Subtasks replaced");
    Ok(Json(DataResponse { data: subtasks }))
}

/// PUT /api/v1/subtasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateSubtask>,
) -> AppResult<Json<Subtask>> {
    if let Some(name) = &input.name {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        input.name = Some(trimmed.to_string());
    }
    let subtask = SubtaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subtask",
            id,
        }))?;
    Ok(Json(subtask))
}
