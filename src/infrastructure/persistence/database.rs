use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Shared SQLite pool holding the tracking log tables
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = db_url.contains(":memory:");

        // Ensure the directory exists if it's a file path
        if !in_memory && let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let mut options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid database URL: {}", db_url))?
            .create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
        }

        // Each in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// In-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:", 1).await
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Food catalog and food log
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS foods (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL DEFAULT 1,
                name TEXT NOT NULL,
                calories REAL NOT NULL DEFAULT 0,
                protein_g REAL NOT NULL DEFAULT 0,
                carbs_g REAL NOT NULL DEFAULT 0,
                fat_g REAL NOT NULL DEFAULT 0,
                serving_size TEXT
            );
            CREATE TABLE IF NOT EXISTS food_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                food_id INTEGER NOT NULL REFERENCES foods (id),
                log_date DATE NOT NULL,
                meal_type TEXT,
                quantity REAL NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_food_logs_user_date
            ON food_logs (user_id, log_date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create nutrition tables")?;

        // 2. Water
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS water_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                log_date DATE NOT NULL,
                liters REAL NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_water_logs_user_date
            ON water_logs (user_id, log_date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create water_logs table")?;

        // 3. Body measurements
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS body_measurements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                measurement_date DATE NOT NULL,
                weight_kg REAL,
                body_fat_percentage REAL,
                chest_cm REAL,
                waist_cm REAL,
                hips_cm REAL,
                bicep_left_cm REAL,
                bicep_right_cm REAL,
                thigh_left_cm REAL,
                thigh_right_cm REAL,
                notes TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_body_measurements_user_date
            ON body_measurements (user_id, measurement_date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create body_measurements table")?;

        // 4. Sleep and steps
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sleep_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                log_date DATE NOT NULL,
                hours_slept REAL NOT NULL DEFAULT 0,
                sleep_quality INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_sleep_logs_user_date
            ON sleep_logs (user_id, log_date);
            CREATE TABLE IF NOT EXISTS step_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                log_date DATE NOT NULL,
                steps INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_step_logs_user_date
            ON step_logs (user_id, log_date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create self care tables")?;

        // 5. Training
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                session_date DATE NOT NULL,
                start_time DATETIME,
                end_time DATETIME,
                notes TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_workout_sessions_user_date
            ON workout_sessions (user_id, session_date);
            CREATE TABLE IF NOT EXISTS workout_sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES workout_sessions (id),
                exercise TEXT,
                set_number INTEGER,
                weight_kg REAL NOT NULL DEFAULT 0,
                reps INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create training tables")?;

        info!("Database schema initialized.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_in_memory_schema_created() {
        let db = Database::in_memory().await.unwrap();
        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(&db.pool)
            .await
            .unwrap();
        let tables: Vec<String> = rows.iter().map(|r| r.try_get("name").unwrap()).collect();

        for table in [
            "foods",
            "food_logs",
            "water_logs",
            "body_measurements",
            "sleep_logs",
            "step_logs",
            "workout_sessions",
            "workout_sets",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing {}", table);
        }
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.init().await.unwrap();
    }
}
