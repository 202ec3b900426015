//! Integration tests for the database infrastructure
//!
//! These tests verify that PostgreSQL is properly configured and
//! accessible from the application. They require a running database,
//! so they are ignored by default:
//!
//! ```sh
//! DATABASE_URL=postgresql://... cargo test -p common -- --ignored
//! ```

use common::database::{DatabaseConfig, health_check, init_pool};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_connectivity() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}
