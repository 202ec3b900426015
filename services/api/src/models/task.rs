//! Task models for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task entity
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Display position, assigned at creation as last + 1
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request for creating a task
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update request for a task
///
/// `description` distinguishes an absent field (untouched) from an
/// explicit `null` (cleared), so the outer `Option` marks presence.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub order: Option<i32>,
}

/// Wrap a present field in `Some` so a missing field stays `None`
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub include_completed: Option<bool>,
}
