//! Task progress and plain-text / JSON breakdown export.

use serde::{Deserialize, Serialize};

use crate::task::{Importance, TaskDuration};

/// Percentage of completed subtasks, `0.0` when there are none.
pub fn progress_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// [`progress_percentage`] rounded to the nearest whole percent.
pub fn rounded_progress(completed: usize, total: usize) -> u32 {
    progress_percentage(completed, total).round() as u32
}

/// One subtask line of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub order: i32,
    pub name: String,
    pub completed: bool,
}

/// A task with its ordered subtasks and progress summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBreakdown {
    pub task_name: String,
    pub task_description: Option<String>,
    pub importance: Importance,
    pub duration: TaskDuration,
    pub subtasks: Vec<BreakdownItem>,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub progress_percentage: f64,
}

impl TaskBreakdown {
    /// Build a breakdown, deriving the counts and percentage from `subtasks`.
    pub fn new(
        task_name: impl Into<String>,
        task_description: Option<String>,
        importance: Importance,
        duration: TaskDuration,
        subtasks: Vec<BreakdownItem>,
    ) -> Self {
        let total_steps = subtasks.len();
        let completed_steps = subtasks.iter().filter(|s| s.completed).count();
        Self {
            task_name: task_name.into(),
            task_description,
            importance,
            duration,
            subtasks,
            total_steps,
            completed_steps,
            progress_percentage: progress_percentage(completed_steps, total_steps),
        }
    }
}

/// Export rendering selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

/// Render one breakdown as plain text.
pub fn format_breakdown_text(data: &TaskBreakdown) -> String {
    let mut lines = vec![
        format!("TASK: {}", data.task_name),
        format!(
            "Description: {}",
            data.task_description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("No description")
        ),
        format!("Importance: {}", data.importance.as_str().to_uppercase()),
        format!("Duration: {}", data.duration.as_str().to_uppercase()),
        format!(
            "Progress: {}/{} ({}%)",
            data.completed_steps,
            data.total_steps,
            data.progress_percentage.round()
        ),
        String::new(),
    ];

    if data.subtasks.is_empty() {
        lines.push("No subtasks available".to_string());
    } else {
        lines.push("SUBTASKS:".to_string());
        lines.extend(data.subtasks.iter().map(|s| {
            let mark = if s.completed { "[x]" } else { "[ ]" };
            format!("{mark} {}. {}", s.order, s.name)
        }));
    }

    lines.join("\n")
}

/// Render every breakdown, separated by rules.
pub fn format_all_breakdowns_text(all: &[TaskBreakdown]) -> String {
    if all.is_empty() {
        return "No tasks with flowcharts found.".to_string();
    }

    let mut lines = vec![
        "ALL TASK BREAKDOWNS".to_string(),
        "=".repeat(50),
        String::new(),
    ];
    for (i, data) in all.iter().enumerate() {
        lines.push(format_breakdown_text(data));
        if i + 1 < all.len() {
            lines.push(String::new());
            lines.push("-".repeat(30));
            lines.push(String::new());
        }
    }
    lines.join("\n")
}

/// Pretty-printed JSON for one or many breakdowns.
pub fn breakdown_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(order: i32, name: &str, completed: bool) -> BreakdownItem {
        BreakdownItem {
            order,
            name: name.to_string(),
            completed,
        }
    }

    fn sample() -> TaskBreakdown {
        TaskBreakdown::new(
            "Plan trip",
            None,
            Importance::High,
            TaskDuration::Long,
            vec![
                item(1, "Pick dates", true),
                item(2, "Book flights", true),
                item(3, "Book hotel", false),
                item(4, "Pack", false),
                item(5, "Go", false),
            ],
        )
    }

    #[test]
    fn two_of_five_is_forty_percent() {
        assert_eq!(progress_percentage(2, 5), 40.0);
        assert_eq!(rounded_progress(2, 5), 40);
    }

    #[test]
    fn no_subtasks_is_zero_percent() {
        assert_eq!(progress_percentage(0, 0), 0.0);
        assert_eq!(rounded_progress(0, 0), 0);
    }

    #[test]
    fn rounding_is_to_nearest() {
        assert_eq!(rounded_progress(1, 3), 33);
        assert_eq!(rounded_progress(2, 3), 67);
    }

    #[test]
    fn breakdown_derives_counts() {
        let data = sample();
        assert_eq!(data.total_steps, 5);
        assert_eq!(data.completed_steps, 2);
        assert_eq!(data.progress_percentage, 40.0);
    }

    #[test]
    fn text_rendering_lists_subtasks() {
        let text = format_breakdown_text(&sample());
        assert!(text.starts_with("TASK: Plan trip\nDescription: No description\n"));
        assert!(text.contains("Importance: HIGH"));
        assert!(text.contains("Duration: LONG"));
        assert!(text.contains("Progress: 2/5 (40%)"));
        assert!(text.contains("[x] 1. Pick dates"));
        assert!(text.ends_with("[ ] 5. Go"));
    }

    #[test]
    fn text_rendering_without_subtasks() {
        let data = TaskBreakdown::new(
            "Solo",
            Some("desc".into()),
            Importance::Low,
            TaskDuration::Short,
            vec![],
        );
        let text = format_breakdown_text(&data);
        assert!(text.contains("Description: desc"));
        assert!(text.contains("Progress: 0/0 (0%)"));
        assert!(text.ends_with("No subtasks available"));
    }

    #[test]
    fn all_breakdowns_separated_by_rules() {
        assert_eq!(
            format_all_breakdowns_text(&[]),
            "No tasks with flowcharts found."
        );
        let text = format_all_breakdowns_text(&[sample(), sample()]);
        assert!(text.starts_with("ALL TASK BREAKDOWNS\n"));
        assert_eq!(text.matches(&"-".repeat(30)).count(), 1);
    }

    #[test]
    fn json_rendering_is_pretty() {
        let json = breakdown_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["completed_steps"], 2);
        assert_eq!(value["importance"], "high");
        assert!(json.contains('\n'));
    }
}
