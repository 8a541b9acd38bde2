//! Flowchart (subtask breakdown) results.
//!
//! A flowchart is an ordered list of [`FlowchartNode`]s. It comes from one
//! of three places: persisted subtasks, the short-task shortcut, or a
//! freshly generated model answer.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::extraction::strip_code_fence;
use crate::flow::FlowchartNode;
use crate::steps::MAX_STEPS_PER_FLOW;

/// Context attached to the single node of a short task.
pub const SHORT_TASK_CONTEXT: &str =
    "This is a short task - no subtasks needed. Complete it directly!";

/// Where a flowchart came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowchartSource {
    Database,
    ShortTask,
    Generated,
}

/// The single-node flowchart returned for short tasks.
pub fn short_task_flowchart(task_name: &str) -> Vec<FlowchartNode> {
    vec![FlowchartNode {
        id: "1".to_string(),
        label: task_name.to_string(),
        context: Some(SHORT_TASK_CONTEXT.to_string()),
    }]
}

/// Build flowchart nodes from persisted `(order_index, name)` pairs, which
/// must already be sorted by `order_index`.
pub fn flowchart_from_subtasks<'a>(
    subtasks: impl IntoIterator<Item = (i32, &'a str)>,
    task_name: &str,
) -> Vec<FlowchartNode> {
    subtasks
        .into_iter()
        .map(|(order_index, name)| FlowchartNode {
            id: order_index.to_string(),
            label: name.to_string(),
            context: Some(format!("Subtask {order_index} of {task_name}")),
        })
        .collect()
}

/// Parse a generated flowchart: a JSON array of `{ id, label, context }`,
/// optionally inside a markdown fence.
///
/// Entries without an id take their 1-based position. Every entry needs a
/// non-empty `label`, and the array must not be empty.
pub fn parse_generated_flowchart(content: &str) -> Result<Vec<FlowchartNode>, CoreError> {
    let json = strip_code_fence(content);
    let parsed: Value = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("Invalid JSON response from AI: {e}")))?;

    let entries = parsed
        .as_array()
        .ok_or_else(|| CoreError::Validation("AI did not return a flowchart array".to_string()))?;

    if entries.is_empty() {
        return Err(CoreError::Validation("AI returned an empty flowchart".to_string()));
    }
    if entries.len() > MAX_STEPS_PER_FLOW {
        return Err(CoreError::Validation(format!(
            "AI returned {} subtasks, exceeding the maximum of {MAX_STEPS_PER_FLOW}",
            entries.len()
        )));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let label = entry
                .get("label")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .ok_or_else(|| {
                    CoreError::Validation(format!("flowchart entry {} has no label", i + 1))
                })?;

            let id = match entry.get("id") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => (i + 1).to_string(),
            };

            Ok(FlowchartNode {
                id,
                label: label.to_string(),
                context: entry
                    .get("context")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect()
}
