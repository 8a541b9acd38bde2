//! Handlers for step parsing and step diagram editing.
//!
//! These endpoints are stateless: the client sends the current diagram with
//! each edit and receives the updated one back.

use axum::extract::Path;
use axum::Json;
use serde::{Deserialize, Serialize};
use voicepath_core::flow::{parse_json_flow, steps_to_flow, Flow, FlowNode};
use voicepath_core::steps::{parse_steps, Step};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ParseStepsRequest {
    pub text: String,
    #[serde(default)]
    pub fill_missing_numbers: bool,
}

#[derive(Debug, Serialize)]
pub struct ParsedSteps {
    pub steps: Vec<Step>,
    pub flow: Flow,
    pub warnings: Vec<String>,
}

/// A diagram plus any structural warnings about it.
#[derive(Debug, Serialize)]
pub struct FlowWithWarnings {
    pub flow: Flow,
    pub warnings: Vec<String>,
}

impl From<Flow> for FlowWithWarnings {
    fn from(flow: Flow) -> Self {
        let warnings = flow.warnings();
        Self { flow, warnings }
    }
}

#[derive(Debug, Serialize)]
pub struct AddedNode {
    pub node: FlowNode,
    pub flow: Flow,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNodeRequest {
    pub flow: Flow,
    pub title: String,
    /// Free text; each non-empty line becomes one detail.
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct ToggledNode {
    pub completed: bool,
    pub flow: Flow,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub flow: Flow,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct Connected {
    /// `false` when the edge already existed.
    pub added: bool,
    pub flow: Flow,
}

fn node_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Node {id} not found"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/steps/parse
pub async fn parse(
    Json(input): Json<ParseStepsRequest>,
) -> AppResult<Json<DataResponse<ParsedSteps>>> {
    let steps = parse_steps(&input.text, input.fill_missing_numbers)?;
    let flow = steps_to_flow(&steps);
    let warnings = flow.warnings();

    tracing::debug!(
        steps = steps.len(),
        fill_missing_numbers = input.fill_missing_numbers,
        "Parsed step text"
    );

    Ok(Json(DataResponse {
        data: ParsedSteps {
            steps,
            flow,
            warnings,
        },
    }))
}

/// POST /api/v1/flows/import
///
/// The body is the raw JSON document.
pub async fn import(body: String) -> AppResult<Json<DataResponse<FlowWithWarnings>>> {
    let flow = parse_json_flow(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(DataResponse { data: flow.into() }))
}

/// POST /api/v1/flows/steps
pub async fn to_steps(Json(flow): Json<Flow>) -> AppResult<Json<DataResponse<Vec<Step>>>> {
    Ok(Json(DataResponse {
        data: flow.to_steps(),
    }))
}

/// POST /api/v1/flows/nodes
pub async fn add_node(Json(mut flow): Json<Flow>) -> AppResult<Json<DataResponse<AddedNode>>> {
    let node = flow.add_node()?.clone();
    Ok(Json(DataResponse {
        data: AddedNode { node, flow },
    }))
}

/// DELETE /api/v1/flows/nodes/{id}
pub async fn delete_node(
    Path(id): Path<String>,
    Json(mut flow): Json<Flow>,
) -> AppResult<Json<DataResponse<FlowWithWarnings>>> {
    if !flow.delete_node(&id) {
        return Err(node_not_found(&id));
    }
    Ok(Json(DataResponse { data: flow.into() }))
}

/// PUT /api/v1/flows/nodes/{id}
pub async fn update_node(
    Path(id): Path<String>,
    Json(input): Json<UpdateNodeRequest>,
) -> AppResult<Json<DataResponse<FlowWithWarnings>>> {
    let mut flow = input.flow;
    if !flow.update_node(&id, &input.title, &input.details) {
        return Err(node_not_found(&id));
    }
    Ok(Json(DataResponse { data: flow.into() }))
}

/// POST /api/v1/flows/nodes/{id}/toggle
pub async fn toggle_node(
    Path(id): Path<String>,
    Json(mut flow): Json<Flow>,
) -> AppResult<Json<DataResponse<ToggledNode>>> {
    let completed = flow
        .toggle_completion(&id)
        .ok_or_else(|| node_not_found(&id))?;
    Ok(Json(DataResponse {
        data: ToggledNode { completed, flow },
    }))
}

/// POST /api/v1/flows/edges
pub async fn connect(
    Json(input): Json<ConnectRequest>,
) -> AppResult<Json<DataResponse<Connected>>> {
    let mut flow = input.flow;
    let added = flow.connect(&input.source, &input.target)?;
    Ok(Json(DataResponse {
        data: Connected { added, flow },
    }))
}
