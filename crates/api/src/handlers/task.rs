//! Handlers for the `/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use voicepath_core::error::CoreError;
use voicepath_core::focus::{format_elapsed, FocusSession, DEFAULT_CHECK_IN_MINUTES};
use voicepath_core::task::{validate_task_name, ChatMessage, ChatRole, ManageAction};
use voicepath_core::types::DbId;
use voicepath_db::models::task::{CreateTask, Task, UpdateTask};
use voicepath_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::query::UserQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// Message returned when a task is missing or owned by someone else.
pub const NOT_FOUND_OR_DENIED: &str = "Task not found or access denied";

pub(crate) fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// Load a task or fail with 404.
pub(crate) async fn load_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.task_name = validate_task_name(&input.task_name)?;
    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::info!(task_id = %task.id, user_id = %task.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/tasks?user_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = TaskRepo::list_by_user(&state.pool, params.user_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    Ok(Json(load_task(&state, id).await?))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    if let Some(name) = &input.task_name {
        input.task_name = Some(validate_task_name(name)?);
    }
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(Json(task))
}

// ---------------------------------------------------------------------------
// Management
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ManageTaskRequest {
    pub user_id: DbId,
    #[serde(flatten)]
    pub action: ManageAction,
}

#[derive(Debug, Serialize)]
pub struct ManageTaskResponse {
    pub success: bool,
    pub action: &'static str,
    pub message: &'static str,
    /// The renamed task; absent for delete and complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

/// POST /api/v1/tasks/{id}/manage
///
/// Ownership is checked before any action. `complete` removes the task the
/// same way `delete` does.
pub async fn manage(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ManageTaskRequest>,
) -> AppResult<Json<ManageTaskResponse>> {
    let denied = || AppError::NotFound(NOT_FOUND_OR_DENIED.to_string());

    TaskRepo::find_owned(&state.pool, id, input.user_id)
        .await?
        .ok_or_else(denied)?;

    let (message, task) = match &input.action {
        ManageAction::Delete | ManageAction::Complete => {
            if !TaskRepo::delete_owned(&state.pool, id, input.user_id).await? {
                return Err(denied());
            }
            let message = if input.action == ManageAction::Complete {
                "Task completed successfully"
            } else {
                "Task deleted successfully"
            };
            (message, None)
        }
        ManageAction::Rename { new_task_name } => {
            let name = validate_task_name(new_task_name)?;
            let task = TaskRepo::rename_owned(&state.pool, id, input.user_id, &name)
                .await?
                .ok_or_else(denied)?;
            ("Task renamed successfully", Some(task))
        }
    };

    tracing::info!(
        task_id = %id,
        user_id = %input.user_id,
        action = input.action.name(),
        "Task managed",
    );

    Ok(Json(ManageTaskResponse {
        success: true,
        action: input.action.name(),
        message,
        task,
    }))
}

// ---------------------------------------------------------------------------
// Focus time and chat
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FocusTimeRequest {
    /// Total focus time in seconds.
    pub focus_time: i64,
    /// Minutes between check-ins for the resumed session.
    #[serde(default)]
    pub check_in_minutes: Option<u32>,
}

/// The updated task plus a paused session the client resumes from.
#[derive(Debug, Serialize)]
pub struct FocusTimeResponse {
    #[serde(flatten)]
    pub task: Task,
    /// Focus time as `HH:MM:SS`.
    pub elapsed: String,
    pub session: FocusSession,
}

/// PUT /api/v1/tasks/{id}/focus-time
pub async fn set_focus_time(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FocusTimeRequest>,
) -> AppResult<Json<FocusTimeResponse>> {
    let Ok(seconds) = u64::try_from(input.focus_time) else {
        return Err(AppError::BadRequest("focus_time must not be negative".to_string()));
    };
    let task = TaskRepo::set_focus_time(&state.pool, id, input.focus_time)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    let elapsed = format_elapsed(seconds);
    tracing::info!(task_id = %id, focus_time = %elapsed, "Focus time recorded");

    let check_in_minutes = input.check_in_minutes.unwrap_or(DEFAULT_CHECK_IN_MINUTES);
    Ok(Json(FocusTimeResponse {
        task,
        elapsed,
        session: FocusSession::new(seconds, check_in_minutes),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub role: ChatRole,
    pub content: String,
}

/// POST /api/v1/tasks/{id}/chat
pub async fn append_chat(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChatMessageRequest>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    if input.content.trim().is_empty() {
        return Err(AppError::BadRequest("content must not be empty".to_string()));
    }
    let message = ChatMessage {
        role: input.role,
        content: input.content,
        timestamp: chrono::Utc::now().timestamp_millis(),
    };
    let task = TaskRepo::append_chat(&state.pool, id, &[message])
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(Json(DataResponse {
        data: task.chat_history.0,
    }))
}
