//! Repositories for database operations

pub mod pomodoro;
pub mod settings;
pub mod tasks;

pub use pomodoro::SessionRepository;
pub use settings::SettingsRepository;
pub use tasks::TaskRepository;
