//! User settings repository for database operations
//!
//! Settings live in a single fixed-id row created lazily on first read.

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::models::settings::{UpdateSettingsRequest, UserSettings};

/// Fixed identifier of the singleton settings row
const SETTINGS_ID: i32 = 1;

/// Settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Create a new settings repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn settings_from_row(row: &PgRow) -> UserSettings {
        UserSettings {
            id: row.get("id"),
            theme: row.get("theme"),
            color_scheme: row.get("color_scheme"),
            immersive_mode: row.get("immersive_mode"),
            focus_duration: row.get("focus_duration"),
            break_duration: row.get("break_duration"),
            long_break_duration: row.get("long_break_duration"),
            sessions_until_long_break: row.get("sessions_until_long_break"),
        }
    }

    /// Insert the defaults row if it does not exist yet
    ///
    /// `ON CONFLICT DO NOTHING` keeps concurrent first reads in agreement.
    async fn ensure_exists(&self) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (id)
            VALUES ($1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(SETTINGS_ID)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the settings, creating the defaults row on first read
    pub async fn get(&self) -> Result<UserSettings> {
        let row = sqlx::query(
            r#"
            SELECT id, theme, color_scheme, immersive_mode, focus_duration,
                   break_duration, long_break_duration, sessions_until_long_break
            FROM user_settings
            WHERE id = $1
            "#,
        )
        .bind(SETTINGS_ID)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(Self::settings_from_row(&row));
        }

        self.ensure_exists().await?;

        let row = sqlx::query(
            r#"
            SELECT id, theme, color_scheme, immersive_mode, focus_duration,
                   break_duration, long_break_duration, sessions_until_long_break
            FROM user_settings
            WHERE id = $1
            "#,
        )
        .bind(SETTINGS_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::settings_from_row(&row))
    }

    /// Overwrite all settings fields
    pub async fn update(&self, settings: &UpdateSettingsRequest) -> Result<UserSettings> {
        self.ensure_exists().await?;

        let row = sqlx::query(
            r#"
            UPDATE user_settings
            SET theme = $2, color_scheme = $3, immersive_mode = $4, focus_duration = $5,
                break_duration = $6, long_break_duration = $7, sessions_until_long_break = $8
            WHERE id = $1
            RETURNING id, theme, color_scheme, immersive_mode, focus_duration,
                      break_duration, long_break_duration, sessions_until_long_break
            "#,
        )
        .bind(SETTINGS_ID)
        .bind(&settings.theme)
        .bind(&settings.color_scheme)
        .bind(settings.immersive_mode)
        .bind(settings.focus_duration)
        .bind(settings.break_duration)
        .bind(settings.long_break_duration)
        .bind(settings.sessions_until_long_break)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::settings_from_row(&row))
    }
}
