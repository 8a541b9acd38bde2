//! Repository for the `tasks` table.

use sqlx::types::Json;
use sqlx::PgPool;
use voicepath_core::extraction::ExtractedTask;
use voicepath_core::task::{ChatMessage, Importance, TaskDuration};
use voicepath_core::types::DbId;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, task_name, description, importance, duration, \
    is_complete, has_subtasks, focus_time, chat_history, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// `importance` and `duration` default to `medium` when omitted.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, task_name, description, importance, duration)
             VALUES ($1, $2, $3, COALESCE($4, 'medium'), COALESCE($5, 'medium'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.user_id)
            .bind(&input.task_name)
            .bind(&input.description)
            .bind(input.importance.map(Importance::as_str))
            .bind(input.duration.map(TaskDuration::as_str))
            .fetch_one(pool)
            .await
    }

    /// Insert every extracted task for `user_id` in a single statement.
    ///
    /// Rows come back newest-first to match [`TaskRepo::list_by_user`].
    pub async fn create_many(
        pool: &PgPool,
        user_id: DbId,
        tasks: &[ExtractedTask],
    ) -> Result<Vec<Task>, sqlx::Error> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = tasks.iter().map(|t| t.task_name.clone()).collect();
        let importances: Vec<String> = tasks
            .iter()
            .map(|t| t.importance.as_str().to_string())
            .collect();
        let durations: Vec<String> = tasks
            .iter()
            .map(|t| t.duration.as_str().to_string())
            .collect();

        let query = format!(
            "INSERT INTO tasks (user_id, task_name, importance, duration)
             SELECT $1, t.task_name, t.importance, t.duration
             FROM UNNEST($2::text[], $3::text[], $4::text[]) AS t(task_name, importance, duration)
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&names)
            .bind(&importances)
            .bind(&durations)
            .fetch_all(pool)
            .await?;

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!(%user_id, count = rows.len(), "Inserted extracted tasks");
        Ok(rows)
    }

    /// Find a task by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task by ID only if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's tasks, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                task_name = COALESCE($2, task_name),
                description = COALESCE($3, description),
                importance = COALESCE($4, importance),
                duration = COALESCE($5, duration),
                is_complete = COALESCE($6, is_complete)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.task_name)
            .bind(&input.description)
            .bind(input.importance.map(Importance::as_str))
            .bind(input.duration.map(TaskDuration::as_str))
            .bind(input.is_complete)
            .fetch_optional(pool)
            .await
    }

    /// Rename a task owned by `user_id`. Returns `None` if it does not exist
    /// or belongs to someone else.
    pub async fn rename_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        task_name: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET task_name = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(task_name)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a task owned by `user_id`. Subtasks cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the accumulated focus time (seconds).
    pub async fn set_focus_time(
        pool: &PgPool,
        id: DbId,
        focus_time: i64,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("UPDATE tasks SET focus_time = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(focus_time)
            .fetch_optional(pool)
            .await
    }

    /// Append messages to the task's chat history.
    pub async fn append_chat(
        pool: &PgPool,
        id: DbId,
        messages: &[ChatMessage],
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET chat_history = chat_history || $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(Json(messages))
            .fetch_optional(pool)
            .await
    }
}
