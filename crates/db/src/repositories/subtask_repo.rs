//! Repository for the `subtasks` table.

use sqlx::PgPool;
use voicepath_core::types::DbId;

use crate::models::subtask::{Subtask, UpdateSubtask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, name, completed, order_index, created_at, updated_at";

/// Provides CRUD operations for subtasks.
pub struct SubtaskRepo;

impl SubtaskRepo {
    /// List a task's subtasks in presentation order.
    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Subtask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subtasks WHERE task_id = $1 ORDER BY order_index, id"
        );
        sqlx::query_as::<_, Subtask>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Find a subtask by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subtask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subtasks WHERE id = $1");
        sqlx::query_as::<_, Subtask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a subtask. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubtask,
    ) -> Result<Option<Subtask>, sqlx::Error> {
        let query = format!(
            "UPDATE subtasks SET
                name = COALESCE($2, name),
                completed = COALESCE($3, completed)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subtask>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.completed)
            .fetch_optional(pool)
            .await
    }

    /// Replace every subtask of a task with `names`, in order.
    ///
    /// `order_index` is the 1-based position in `names`. The parent's
    /// `has_subtasks` flag is set to whether any rows were written. Runs in
    /// a single transaction.
    pub async fn replace_for_task(
        pool: &PgPool,
        task_id: DbId,
        names: &[String],
    ) -> Result<Vec<Subtask>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM subtasks WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        let mut rows = if names.is_empty() {
            Vec::new()
        } else {
            let query = format!(
                "INSERT INTO subtasks (task_id, name, order_index)
                 SELECT $1, t.name, t.ord::INTEGER
                 FROM UNNEST($2::text[]) WITH ORDINALITY AS t(name, ord)
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, Subtask>(&query)
                .bind(task_id)
                .bind(names)
                .fetch_all(&mut *tx)
                .await?
        };

        let updated = sqlx::query("UPDATE tasks SET has_subtasks = $2 WHERE id = $1")
            .bind(task_id)
            .bind(!names.is_empty())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        rows.sort_by_key(|s| s.order_index);
        tracing::debug!(%task_id, count = rows.len(), "Replaced subtasks");
        Ok(rows)
    }

    /// Delete every subtask of a task and reset its `has_subtasks` flag.
    /// Returns the number of subtasks removed.
    pub async fn clear_for_task(pool: &PgPool, task_id: DbId) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM subtasks WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("UPDATE tasks SET has_subtasks = false WHERE id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }
}
