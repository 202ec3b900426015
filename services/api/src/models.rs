//! API models for request and response payloads

pub mod pomodoro;
pub mod settings;
pub mod task;
