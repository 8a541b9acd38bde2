//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use voicepath_core::task::{ChatMessage, Importance, TaskDuration};
use voicepath_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub task_name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub importance: Importance,
    #[sqlx(try_from = "String")]
    pub duration: TaskDuration,
    pub is_complete: bool,
    pub has_subtasks: bool,
    /// Accumulated focus-session time in seconds.
    pub focus_time: i64,
    pub chat_history: Json<Vec<ChatMessage>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub user_id: DbId,
    pub task_name: String,
    pub description: Option<String>,
    /// Defaults to `medium` if omitted.
    pub importance: Option<Importance>,
    /// Defaults to `medium` if omitted.
    pub duration: Option<TaskDuration>,
}

/// DTO for updating an existing task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub importance: Option<Importance>,
    pub duration: Option<TaskDuration>,
    pub is_complete: Option<bool>,
}
