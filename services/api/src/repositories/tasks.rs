//! Task repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::models::task::{Task, UpdateTaskRequest};

/// Task repository
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn task_from_row(row: &PgRow) -> Task {
        Task {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            completed: row.get("completed"),
            order: row.get("order"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Insert a new task at the end of the display order
    ///
    /// The position is computed inside the INSERT so concurrent creates
    /// cannot both take the same slot.
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Task> {
        let row = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, "order")
            VALUES ($1, $2, (SELECT COALESCE(MAX("order") + 1, 0) FROM tasks))
            RETURNING id, title, description, completed, "order", created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::task_from_row(&row))
    }

    /// List tasks in display order
    pub async fn list(&self, include_completed: bool) -> Result<Vec<Task>> {
        let query = if include_completed {
            r#"
            SELECT id, title, description, completed, "order", created_at, updated_at
            FROM tasks
            ORDER BY "order", created_at
            "#
        } else {
            r#"
            SELECT id, title, description, completed, "order", created_at, updated_at
            FROM tasks
            WHERE completed = FALSE
            ORDER BY "order", created_at
            "#
        };

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(Self::task_from_row).collect())
    }

    /// Find a task by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Task>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, completed, "order", created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::task_from_row))
    }

    /// Apply a partial update to a task in one transaction
    pub async fn update(&self, id: i32, patch: &UpdateTaskRequest) -> Result<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, title, description, completed, "order", created_at, updated_at
            FROM tasks
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut task = Self::task_from_row(&row);

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            // present-and-null clears the description
            task.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(order) = patch.order {
            task.order = order;
        }
        task.updated_at = Some(Utc::now());

        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, completed = $4, "order" = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.order)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Delete a task by ID
    ///
    /// The sessions table declares `ON DELETE SET NULL` on its task
    /// reference, so weak references are cleared in the same store-level
    /// unit as the delete.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
