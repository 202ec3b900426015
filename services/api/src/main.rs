use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod db;
mod error;
mod lifecycle;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{DatabaseConfig, init_pool};

use crate::{
    repositories::{SessionRepository, SettingsRepository, TaskRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting FocusFlow API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Create tables on first run
    db::init_schema(&pool).await?;

    info!("FocusFlow API service initialized successfully");

    // Initialize repositories
    let session_repository = SessionRepository::new(pool.clone());
    let task_repository = TaskRepository::new(pool.clone());
    let settings_repository = SettingsRepository::new(pool);

    let app_state = AppState {
        session_repository,
        task_repository,
        settings_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
    info!("FocusFlow API service listening on 0.0.0.0:8000");

    axum::serve(listener, app).await?;

    Ok(())
}
