//! Pomodoro session models and wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a timed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Focus,
    Break,
}

impl SessionType {
    /// Parse the wire form ("focus" or "break")
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "focus" => Some(SessionType::Focus),
            "break" => Some(SessionType::Break),
            _ => None,
        }
    }

    /// Wire and storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Focus => "focus",
            SessionType::Break => "break",
        }
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl SessionState {
    /// Parse the wire form ("pending", "active", "completed", "cancelled")
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SessionState::Pending),
            "active" => Some(SessionState::Active),
            "completed" => Some(SessionState::Completed),
            "cancelled" => Some(SessionState::Cancelled),
            _ => None,
        }
    }

    /// Wire and storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Pending => "pending",
            SessionState::Active => "active",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled sessions accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Cancelled)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pomodoro session entity
#[derive(Debug, Clone, Serialize)]
pub struct PomodoroSession {
    pub id: i32,
    /// Weak reference to a task; cleared when the task is deleted
    pub task_id: Option<i32>,
    pub session_type: SessionType,
    /// Planned length in minutes
    pub duration: i32,
    pub state: SessionState,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Cumulative paused time in milliseconds, never decreasing
    pub paused_duration_ms: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request for creating a pomodoro session
///
/// `session_type` stays a string here so that an unknown value surfaces
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub session_type: String,
    pub duration: i32,
    pub task_id: Option<i32>,
}

/// Partial update request for a pomodoro session
///
/// Absent fields are left untouched.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateSessionRequest {
    pub state: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub paused_duration_ms: Option<i64>,
}

/// Same-day statistics over completed focus sessions
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PomodoroStats {
    pub completed_today: i64,
    pub total_focus_time_minutes: i64,
}
