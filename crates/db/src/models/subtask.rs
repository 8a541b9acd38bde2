//! Subtask entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voicepath_core::types::{DbId, Timestamp};

/// A row from the `subtasks` table: one persisted step of a task breakdown.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subtask {
    pub id: DbId,
    pub task_id: DbId,
    pub name: String,
    pub completed: bool,
    /// 1-based position within the task.
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a subtask. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubtask {
    pub name: Option<String>,
    pub completed: Option<bool>,
}
