//! Task classification enums, chat messages and task-management actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a task name after trimming.
pub const MAX_TASK_NAME_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Importance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Importance::Low, Importance::Medium, Importance::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// Rough effort estimate: short (< 30 min), medium (30 min - 3 h), long (> 3 h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskDuration {
    Short,
    Medium,
    Long,
}

impl TaskDuration {
    pub const ALL: [TaskDuration; 3] = [
        TaskDuration::Short,
        TaskDuration::Medium,
        TaskDuration::Long,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskDuration::Short => "short",
            TaskDuration::Medium => "medium",
            TaskDuration::Long => "long",
        }
    }

    /// Short tasks are tackled directly instead of being broken down.
    pub fn needs_breakdown(self) -> bool {
        self != TaskDuration::Short
    }
}

// ---------------------------------------------------------------------------
// Shared string conversions
// ---------------------------------------------------------------------------

macro_rules! text_enum {
    ($ty:ident, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        CoreError::Validation(format!(concat!("invalid ", $label, " '{}'"), s))
                    })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = CoreError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}

text_enum!(Importance, "importance");
text_enum!(TaskDuration, "duration");

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim a task name and check it is non-empty and within
/// [`MAX_TASK_NAME_LEN`] characters.
pub fn validate_task_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("task name must not be empty".to_string()));
    }
    let len = trimmed.chars().count();
    if len > MAX_TASK_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "task name is {len} characters, exceeding the maximum of {MAX_TASK_NAME_LEN}"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of a task's assistant conversation. `timestamp` is epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Management actions
// ---------------------------------------------------------------------------

/// Owner-initiated lifecycle change for a task.
///
/// `Complete` removes the task just like `Delete`; the two differ only in
/// how the outcome is reported.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ManageAction {
    Delete,
    Complete,
    Rename { new_task_name: String },
}

impl ManageAction {
    pub fn name(&self) -> &'static str {
        match self {
            ManageAction::Delete => "delete",
            ManageAction::Complete => "complete",
            ManageAction::Rename { .. } => "rename",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn importance_parses_known_values() {
        assert_eq!("low".parse::<Importance>().unwrap(), Importance::Low);
        assert_eq!("high".parse::<Importance>().unwrap(), Importance::High);
        assert_matches!(
            "urgent".parse::<Importance>(),
            Err(CoreError::Validation(_))
        );
        assert_matches!("High".parse::<Importance>(), Err(_));
    }

    #[test]
    fn duration_round_trips_through_text() {
        for d in TaskDuration::ALL {
            assert_eq!(TaskDuration::try_from(d.to_string()).unwrap(), d);
        }
    }

    #[test]
    fn only_short_tasks_skip_breakdown() {
        assert!(!TaskDuration::Short.needs_breakdown());
        assert!(TaskDuration::Medium.needs_breakdown());
        assert!(TaskDuration::Long.needs_breakdown());
    }

    #[test]
    fn task_name_is_trimmed() {
        assert_eq!(validate_task_name("  Call dad ").unwrap(), "Call dad");
    }

    #[test]
    fn blank_or_oversized_task_name_rejected() {
        assert_matches!(validate_task_name("   "), Err(CoreError::Validation(_)));
        let long = "x".repeat(MAX_TASK_NAME_LEN + 1);
        assert_matches!(validate_task_name(&long), Err(CoreError::Validation(_)));
    }

    #[test]
    fn manage_action_deserializes_from_tagged_json() {
        let rename: ManageAction =
            serde_json::from_str(r#"{"action":"rename","new_task_name":"New"}"#).unwrap();
        assert_eq!(
            rename,
            ManageAction::Rename {
                new_task_name: "New".to_string()
            }
        );
        let complete: ManageAction = serde_json::from_str(r#"{"action":"complete"}"#).unwrap();
        assert_eq!(complete.name(), "complete");
        assert!(serde_json::from_str::<ManageAction>(r#"{"action":"archive"}"#).is_err());
    }

    #[test]
    fn chat_roles_serialize_lowercase() {
        let msg = ChatMessage {
            role: ChatRole::Assistant,
            content: "hi".into(),
            timestamp: 1,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
