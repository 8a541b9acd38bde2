//! Handlers for task flowcharts (subtask breakdowns).
//!
//! A flowchart is served from persisted subtasks when the task already has
//! them, answered directly for short tasks, and otherwise generated by the
//! model and saved as subtasks.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use voicepath_core::flow::{flowchart_to_flow, Flow, FlowchartNode};
use voicepath_core::flowchart::{
    flowchart_from_subtasks, parse_generated_flowchart, short_task_flowchart, FlowchartSource,
};
use voicepath_core::types::DbId;
use voicepath_db::models::task::Task;
use voicepath_db::repositories::SubtaskRepo;
use voicepath_llm::{prompts, Purpose};

use crate::error::AppResult;
use crate::handlers::task::load_task;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FlowchartResponse {
    pub flowchart: Vec<FlowchartNode>,
    /// The flowchart laid out as a step diagram.
    pub flow: Flow,
    pub source: FlowchartSource,
    pub from_database: bool,
    pub short_task: bool,
    /// Whether the flowchart is persisted as the task's subtasks.
    pub saved: bool,
    pub message: String,
}

impl FlowchartResponse {
    fn new(
        flowchart: Vec<FlowchartNode>,
        source: FlowchartSource,
        saved: bool,
        message: String,
    ) -> Self {
        Self {
            flow: flowchart_to_flow(&flowchart),
            flowchart,
            source,
            from_database: source == FlowchartSource::Database,
            short_task: source == FlowchartSource::ShortTask,
            saved,
            message,
        }
    }
}

/// POST /api/v1/tasks/{id}/flowchart
pub async fn generate(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<FlowchartResponse>> {
    let task = load_task(&state, task_id).await?;
    Ok(Json(load_or_generate(&state, &task).await?))
}

/// POST /api/v1/tasks/{id}/flowchart/regenerate
///
/// Discards the existing subtasks, then generates a fresh flowchart.
pub async fn regenerate(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<FlowchartResponse>> {
    let mut task = load_task(&state, task_id).await?;
    let removed = SubtaskRepo::clear_for_task(&state.pool, task_id).await?;
    tracing::info!(%task_id, removed, "Cleared subtasks for regeneration");
    task.has_subtasks = false;
    Ok(Json(load_or_generate(&state, &task).await?))
}

async fn load_or_generate(state: &AppState, task: &Task) -> AppResult<FlowchartResponse> {
    if task.has_subtasks {
        let subtasks = SubtaskRepo::list_by_task(&state.pool, task.id).await?;
        if !subtasks.is_empty() {
            let flowchart = flowchart_from_subtasks(
                subtasks.iter().map(|s| (s.order_index, s.name.as_str())),
                &task.task_name,
            );
            let message = format!("Loaded {} existing subtasks from database", subtasks.len());
            return Ok(FlowchartResponse::new(flowchart, FlowchartSource::Database, true, message));
        }
    }

    if !task.duration.needs_breakdown() {
        return Ok(FlowchartResponse::new(
            short_task_flowchart(&task.task_name),
            FlowchartSource::ShortTask,
            false,
            "Short tasks don't need subtasks - tackle it directly!".to_string(),
        ));
    }

    let prompt = prompts::flowchart(&task.task_name, task.duration, task.importance);
    let content = state.llm.generate(Purpose::Flowchart, &prompt).await?;
    let flowchart = parse_generated_flowchart(&content)?;

    let names: Vec<String> = flowchart.iter().map(|n| n.label.clone()).collect();
    let saved = match SubtaskRepo::replace_for_task(&state.pool, task.id, &names).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(task_id = %task.id, error = %e, "Failed to save generated subtasks");
            false
        }
    };

    tracing::info!(task_id = %task.id, subtasks = flowchart.len(), saved, "Flowchart generated");
    let message = format!("Generated {} subtasks", flowchart.len());
    Ok(FlowchartResponse::new(flowchart, FlowchartSource::Generated, saved, message))
}
