//! Interpretation of model output for task extraction.
//!
//! Models are asked for bare JSON but frequently wrap it in a markdown
//! fence; [`strip_code_fence`] unwraps it before parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::task::{validate_task_name, Importance, TaskDuration};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid regex"));

/// Return the contents of the first fenced code block, trimmed, or the
/// input unchanged when there is no fence.
pub fn strip_code_fence(content: &str) -> &str {
    match FENCED_BLOCK.captures(content).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => content,
    }
}

/// A task recognised in a transcription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTask {
    pub task_name: String,
    pub importance: Importance,
    pub duration: TaskDuration,
}

/// Parsed extraction result plus notes about values that were defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub tasks: Vec<ExtractedTask>,
    pub corrections: Vec<String>,
}

/// Parse the model's task-extraction answer.
///
/// The answer must be a JSON array. Every entry needs a non-empty string
/// `task_name`; unknown `importance` or `duration` values fall back to
/// `medium` and are reported in [`Extraction::corrections`].
pub fn parse_extracted_tasks(content: &str) -> Result<Extraction, CoreError> {
    let json = strip_code_fence(content);
    let parsed: Value = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("Invalid JSON response from AI: {e}")))?;

    let entries = parsed
        .as_array()
        .ok_or_else(|| CoreError::Validation("AI did not return a valid task array".to_string()))?;

    let mut extraction = Extraction::default();
    for entry in entries {
        let task_name = entry
            .get("task_name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CoreError::Validation("Invalid task: missing or invalid task_name".to_string())
            })
            .and_then(validate_task_name)?;

        let importance = lenient(
            entry,
            "importance",
            &task_name,
            Importance::Medium,
            &mut extraction,
        );
        let duration = lenient(
            entry,
            "duration",
            &task_name,
            TaskDuration::Medium,
            &mut extraction,
        );

        extraction.tasks.push(ExtractedTask {
            task_name,
            importance,
            duration,
        });
    }

    Ok(extraction)
}

fn lenient<T>(entry: &Value, field: &str, task_name: &str, fallback: T, out: &mut Extraction) -> T
where
    T: std::str::FromStr,
{
    let raw = entry.get(field);
    match raw.and_then(Value::as_str).and_then(|s| s.parse().ok()) {
        Some(value) => value,
        None => {
            let shown = raw
                .map(Value::to_string)
                .unwrap_or_else(|| "missing".to_string());
            out.corrections.push(format!(
                "Invalid {field} {shown} for task \"{task_name}\", defaulting to medium"
            ));
            fallback
        }
    }
}
