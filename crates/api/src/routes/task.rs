//! Route definitions for the `/tasks` resource.
//!
//! Also nests subtask, flowchart and export routes under `/tasks/{id}/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{export, flowchart, subtask, task};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /?user_id=                    -> list
/// POST   /                             -> create
/// GET    /{id}                         -> get_by_id
/// PUT    /{id}                         -> update
/// POST   /{id}/manage                  -> manage (delete | complete | rename)
/// PUT    /{id}/focus-time              -> set_focus_time
/// POST   /{id}/chat                    -> append_chat
///
/// GET    /{id}/subtasks                -> list_by_task
/// PUT    /{id}/subtasks                -> replace
///
/// POST   /{id}/flowchart               -> generate
/// POST   /{id}/flowchart/regenerate    -> regenerate
///
/// GET    /{id}/export?format=          -> export_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route("/{id}", get(task::get_by_id).put(task::update))
        .route("/{id}/manage", post(task::manage))
        .route("/{id}/focus-time", put(task::set_focus_time))
        .route("/{id}/chat", post(task::append_chat))
        .route(
            "/{id}/subtasks",
            get(subtask::list_by_task).put(subtask::replace),
        )
        .route("/{id}/flowchart", post(flowchart::generate))
        .route("/{id}/flowchart/regenerate", post(flowchart::regenerate))
        .route("/{id}/export", get(export::export_task))
}
