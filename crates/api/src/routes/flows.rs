//! Route definitions for step parsing and diagram editing.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::flow;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// POST   /steps/parse                -> parse
/// POST   /flows/import               -> import
/// POST   /flows/steps                -> to_steps
/// POST   /flows/nodes                -> add_node
/// PUT    /flows/nodes/{id}           -> update_node
/// DELETE /flows/nodes/{id}           -> delete_node
/// POST   /flows/nodes/{id}/toggle    -> toggle_node
/// POST   /flows/edges                -> connect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/steps/parse", post(flow::parse))
        .route("/flows/import", post(flow::import))
        .route("/flows/steps", post(flow::to_steps))
        .route("/flows/nodes", post(flow::add_node))
        .route(
            "/flows/nodes/{id}",
            put(flow::update_node).delete(flow::delete_node),
        )
        .route("/flows/nodes/{id}/toggle", post(flow::toggle_node))
        .route("/flows/edges", post(flow::connect))
}
