//! Application state shared across handlers

use crate::repositories::{SessionRepository, SettingsRepository, TaskRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session_repository: SessionRepository,
    pub task_repository: TaskRepository,
    pub settings_repository: SettingsRepository,
}
