//! Handlers exporting task breakdowns as text or JSON.

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use voicepath_core::progress::{
    breakdown_json, format_all_breakdowns_text, format_breakdown_text, BreakdownItem,
    ExportFormat, TaskBreakdown,
};
use voicepath_core::types::DbId;
use voicepath_db::models::subtask::Subtask;
use voicepath_db::models::task::Task;
use voicepath_db::repositories::{SubtaskRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::task::load_task;
use crate::query::ExportParams;
use crate::state::AppState;

/// Combine a task and its ordered subtasks into a breakdown.
pub(crate) fn breakdown(task: &Task, subtasks: &[Subtask]) -> TaskBreakdown {
    TaskBreakdown::new(
        task.task_name.clone(),
        task.description.clone(),
        task.importance,
        task.duration,
        subtasks
            .iter()
            .map(|s| BreakdownItem {
                order: s.order_index,
                name: s.name.clone(),
                completed: s.completed,
            })
            .collect(),
    )
}

/// Load the breakdown of one task, or 404.
pub(crate) async fn load_breakdown(state: &AppState, task_id: DbId) -> AppResult<TaskBreakdown> {
    let task = load_task(state, task_id).await?;
    let subtasks = SubtaskRepo::list_by_task(&state.pool, task_id).await?;
    Ok(breakdown(&task, &subtasks))
}

fn plain_text(body: String) -> Response {
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

fn pretty_json<T: Serialize + ?Sized>(data: &T) -> AppResult<Response> {
    let body = breakdown_json(data).map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /api/v1/tasks/{id}/export?format=text|json
pub async fn export_task(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let data = load_breakdown(&state, task_id).await?;
    match params.format {
        ExportFormat::Text => Ok(plain_text(format_breakdown_text(&data))),
        ExportFormat::Json => pretty_json(&data),
    }
}

/// GET /api/v1/users/{user_id}/export?format=text|json
///
/// Includes only tasks that have a saved breakdown.
pub async fn export_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let tasks = TaskRepo::list_by_user(&state.pool, user_id).await?;

    let mut all = Vec::new();
    for task in tasks.iter().filter(|t| t.has_subtasks) {
        let subtasks = SubtaskRepo::list_by_task(&state.pool, task.id).await?;
        all.push(breakdown(task, &subtasks));
    }
    tracing::debug!(%user_id, tasks = all.len(), "Exporting breakdowns");

    match params.format {
        ExportFormat::Text => Ok(plain_text(format_all_breakdowns_text(&all))),
        ExportFormat::Json => pretty_json(&all),
    }
}
