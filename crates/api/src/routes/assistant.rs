//! Route definitions for the `/assistant` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Routes mounted at `/assistant`.
///
/// ```text
/// POST   /                             -> ask
/// POST   /context                      -> add_context
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(assistant::ask))
        .route("/context", post(assistant::add_context))
}
