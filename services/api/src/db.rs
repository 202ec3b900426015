//! Schema bootstrap for the FocusFlow database
//!
//! Tables are created at startup if missing, matching the store layout
//! the repositories expect. Sessions keep a nullable reference to tasks
//! with `ON DELETE SET NULL`: deleting a task clears the weak reference
//! in the same store-level unit, never cascading into session history.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        "order" INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pomodoro_sessions (
        id SERIAL PRIMARY KEY,
        task_id INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
        session_type VARCHAR(20) NOT NULL,
        duration INTEGER NOT NULL,
        state VARCHAR(20) NOT NULL DEFAULT 'pending',
        started_at TIMESTAMPTZ,
        completed_at TIMESTAMPTZ,
        paused_duration_ms BIGINT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_pomodoro_sessions_state
        ON pomodoro_sessions(state, created_at DESC)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_pomodoro_sessions_stats
        ON pomodoro_sessions(session_type, state, completed_at)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_settings (
        id INTEGER PRIMARY KEY,
        theme VARCHAR(20) NOT NULL DEFAULT 'dark',
        color_scheme VARCHAR(20) NOT NULL DEFAULT 'default',
        immersive_mode BOOLEAN NOT NULL DEFAULT TRUE,
        focus_duration INTEGER NOT NULL DEFAULT 25,
        break_duration INTEGER NOT NULL DEFAULT 5,
        long_break_duration INTEGER NOT NULL DEFAULT 15,
        sessions_until_long_break INTEGER NOT NULL DEFAULT 4
    )
    "#,
];

/// Create the FocusFlow tables and indexes if they do not exist
pub async fn init_schema(pool: &PgPool) -> DatabaseResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    info!("Database schema initialized");
    Ok(())
}
