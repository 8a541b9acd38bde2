//! Route definitions for the `/subtasks` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::subtask;
use crate::state::AppState;

/// Routes mounted at `/subtasks`.
///
/// ```text
/// PUT    /{id}                         -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(subtask::update))
}
