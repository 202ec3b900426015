//! User settings models

use serde::{Deserialize, Serialize};

/// User settings singleton, used as client-side defaults
#[derive(Debug, Clone, Serialize)]
pub struct UserSettings {
    pub id: i32,
    pub theme: String,
    pub color_scheme: String,
    pub immersive_mode: bool,
    /// Minutes
    pub focus_duration: i32,
    /// Minutes
    pub break_duration: i32,
    /// Minutes
    pub long_break_duration: i32,
    pub sessions_until_long_break: i32,
}

/// Full-overwrite settings update; omitted fields fall back to defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdateSettingsRequest {
    pub theme: String,
    pub color_scheme: String,
    pub immersive_mode: bool,
    pub focus_duration: i32,
    pub break_duration: i32,
    pub long_break_duration: i32,
    pub sessions_until_long_break: i32,
}

impl Default for UpdateSettingsRequest {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            color_scheme: "default".to_string(),
            immersive_mode: true,
            focus_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_until_long_break: 4,
        }
    }
}
