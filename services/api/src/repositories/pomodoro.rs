//! Pomodoro session repository for database operations
//!
//! Mutations are one read-modify-write unit each: load the row under
//! `FOR UPDATE`, run the lifecycle engine in memory, write back, commit.
//! Dropping the transaction on any error path rolls back.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use thiserror::Error;

use crate::lifecycle::{self, LifecycleError, SessionPatch};
use crate::models::pomodoro::{PomodoroSession, PomodoroStats, SessionState, SessionType};

/// Failure modes of the transactional session update path
#[derive(Error, Debug)]
pub enum SessionUpdateError {
    #[error("session not found")]
    NotFound,

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Pomodoro session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn session_from_row(row: &PgRow) -> Result<PomodoroSession, sqlx::Error> {
        let session_type: String = row.get("session_type");
        let session_type = SessionType::parse(&session_type).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown session_type: {session_type}").into())
        })?;

        let state: String = row.get("state");
        let state = SessionState::parse(&state)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown session state: {state}").into()))?;

        Ok(PomodoroSession {
            id: row.get("id"),
            task_id: row.get("task_id"),
            session_type,
            duration: row.get("duration"),
            state,
            started_at: row.get("started_at"),
            completed_at: row.get("completed_at"),
            paused_duration_ms: row.get("paused_duration_ms"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Insert a new session in the pending state
    ///
    /// Input is validated before this is called; nothing is persisted for
    /// malformed requests.
    pub async fn create(
        &self,
        session_type: SessionType,
        duration: i32,
        task_id: Option<i32>,
    ) -> Result<PomodoroSession> {
        let row = sqlx::query(
            r#"
            INSERT INTO pomodoro_sessions (task_id, session_type, duration)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, session_type, duration, state, started_at,
                      completed_at, paused_duration_ms, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(session_type.as_str())
        .bind(duration)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::session_from_row(&row)?)
    }

    /// Find a session by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<PomodoroSession>> {
        let row = sqlx::query(
            r#"
            SELECT id, task_id, session_type, duration, state, started_at,
                   completed_at, paused_duration_ms, created_at, updated_at
            FROM pomodoro_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::session_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find the currently active session
    ///
    /// Most recently created wins when several rows are marked active;
    /// callers must treat this as best-effort, not a uniqueness guarantee.
    pub async fn find_active(&self) -> Result<Option<PomodoroSession>> {
        let row = sqlx::query(
            r#"
            SELECT id, task_id, session_type, duration, state, started_at,
                   completed_at, paused_duration_ms, created_at, updated_at
            FROM pomodoro_sessions
            WHERE state = 'active'
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::session_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Apply a lifecycle patch to a session in one transaction
    pub async fn update(
        &self,
        id: i32,
        patch: &SessionPatch,
    ) -> Result<PomodoroSession, SessionUpdateError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, task_id, session_type, duration, state, started_at,
                   completed_at, paused_duration_ms, created_at, updated_at
            FROM pomodoro_sessions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SessionUpdateError::NotFound)?;

        let session = Self::session_from_row(&row)?;
        let updated = lifecycle::apply_patch(&session, patch, Utc::now())?;

        sqlx::query(
            r#"
            UPDATE pomodoro_sessions
            SET state = $2, started_at = $3, completed_at = $4,
                paused_duration_ms = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(updated.state.as_str())
        .bind(updated.started_at)
        .bind(updated.completed_at)
        .bind(updated.paused_duration_ms)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Same-day statistics over completed focus sessions
    ///
    /// Two independent aggregate queries so the cost stays at the store
    /// layer instead of loading rows into memory.
    pub async fn stats_today(&self) -> Result<PomodoroStats> {
        let today_start = utc_day_start(Utc::now());

        let completed_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM pomodoro_sessions
            WHERE session_type = 'focus' AND state = 'completed' AND completed_at >= $1
            "#,
        )
        .bind(today_start)
        .fetch_one(&self.pool)
        .await?;

        let total_focus_time_minutes: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(duration), 0)
            FROM pomodoro_sessions
            WHERE session_type = 'focus' AND state = 'completed' AND completed_at >= $1
            "#,
        )
        .bind(today_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(PomodoroStats {
            completed_today,
            total_focus_time_minutes,
        })
    }
}

/// Start of the UTC calendar day containing `now`
fn utc_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_utc_day_start() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 17, 42, 13).unwrap();
        let start = utc_day_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 28, 0, 0, 0).unwrap());

        // midnight maps to itself, keeping the window half-open
        assert_eq!(utc_day_start(start), start);
    }
}
