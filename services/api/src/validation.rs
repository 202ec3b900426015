//! Input validation utilities
//!
//! Validation runs before any store write, so malformed input never
//! reaches the database.

use crate::models::pomodoro::SessionType;
use crate::models::settings::UpdateSettingsRequest;

/// Validate and parse a session type
pub fn validate_session_type(value: &str) -> Result<SessionType, String> {
    SessionType::parse(value)
        .ok_or_else(|| format!("session_type must be 'focus' or 'break', got '{value}'"))
}

/// Validate a planned session duration in minutes
pub fn validate_session_duration(minutes: i32) -> Result<(), String> {
    if !(1..=60).contains(&minutes) {
        return Err(format!(
            "duration must be between 1 and 60 minutes, got {minutes}"
        ));
    }

    Ok(())
}

/// Validate a task title
pub fn validate_task_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("title is required".to_string());
    }

    if title.chars().count() > 255 {
        return Err("title must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate a settings update
pub fn validate_settings(settings: &UpdateSettingsRequest) -> Result<(), String> {
    if !matches!(settings.theme.as_str(), "light" | "dark") {
        return Err(format!(
            "theme must be 'light' or 'dark', got '{}'",
            settings.theme
        ));
    }

    if !matches!(settings.color_scheme.as_str(), "default" | "forest") {
        return Err(format!(
            "color_scheme must be 'default' or 'forest', got '{}'",
            settings.color_scheme
        ));
    }

    if !(1..=60).contains(&settings.focus_duration) {
        return Err("focus_duration must be between 1 and 60 minutes".to_string());
    }

    if !(1..=30).contains(&settings.break_duration) {
        return Err("break_duration must be between 1 and 30 minutes".to_string());
    }

    if !(1..=60).contains(&settings.long_break_duration) {
        return Err("long_break_duration must be between 1 and 60 minutes".to_string());
    }

    if !(1..=10).contains(&settings.sessions_until_long_break) {
        return Err("sessions_until_long_break must be between 1 and 10".to_string());
    }

    Ok(())
}
