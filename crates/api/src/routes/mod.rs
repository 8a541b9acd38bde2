pub mod assistant;
pub mod flows;
pub mod health;
pub mod subtask;
pub mod task;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{export, voice_task};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /steps/parse                         parse step text (POST)
/// /flows/...                           stateless diagram editing
/// /voice-tasks                         extract tasks from a transcription (POST)
/// /tasks/...                           task CRUD, subtasks, flowcharts, export
/// /subtasks/{id}                       update a subtask (PUT)
/// /users/{user_id}/export              export every breakdown (GET)
/// /assistant/...                       productivity assistant
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(flows::router())
        .route("/voice-tasks", post(voice_task::process))
        .nest("/tasks", task::router())
        .nest("/subtasks", subtask::router())
        .route("/users/{user_id}/export", get(export::export_user))
        .nest("/assistant", assistant::router())
}
