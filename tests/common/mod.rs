#![allow(dead_code)]

use gymgraph::application::analytics::{AnalyticsService, MetricQueryEngine};
use gymgraph::domain::analytics::catalog::MetricCatalog;
use gymgraph::domain::repositories::UserId;
use gymgraph::infrastructure::observability::Metrics;
use gymgraph::infrastructure::persistence::{Database, SqliteMetricStore};
use std::sync::Arc;

pub const USER: i64 = 1;
pub const OTHER_USER: i64 = 2;

/// In-memory database plus a service scoped to [`USER`].
pub struct Fixture {
    pub db: Database,
    pub metrics: Metrics,
    pub service: Arc<AnalyticsService>,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = Database::in_memory().await.expect("in-memory database");
        let catalog = Arc::new(MetricCatalog::builtin().expect("built-in catalog"));
        let metrics = Metrics::new().expect("metrics");
        let store = Arc::new(SqliteMetricStore::new(db.pool.clone()));
        let engine = MetricQueryEngine::new(catalog, store).with_metrics(metrics.clone());
        let service = Arc::new(AnalyticsService::new(engine, UserId(USER), metrics.clone()));
        Self {
            db,
            metrics,
            service,
        }
    }

    pub async fn add_food(&self, name: &str, calories: f64, protein_g: f64) -> i64 {
        sqlx::query("INSERT INTO foods (name, calories, protein_g) VALUES (?, ?, ?)")
            .bind(name)
            .bind(calories)
            .bind(protein_g)
            .execute(&self.db.pool)
            .await
            .expect("insert food")
            .last_insert_rowid()
    }

    pub async fn log_food(&self, user: i64, food_id: i64, date: &str, quantity: f64) {
        sqlx::query(
            "INSERT INTO food_logs (user_id, food_id, log_date, quantity) VALUES (?, ?, ?, ?)",
        )
        .bind(user)
        .bind(food_id)
        .bind(date)
        .bind(quantity)
        .execute(&self.db.pool)
        .await
        .expect("insert food log");
    }

    pub async fn log_water(&self, user: i64, date: &str, liters: f64) {
        sqlx::query("INSERT INTO water_logs (user_id, log_date, liters) VALUES (?, ?, ?)")
            .bind(user)
            .bind(date)
            .bind(liters)
            .execute(&self.db.pool)
            .await
            .expect("insert water log");
    }

    pub async fn log_steps(&self, user: i64, date: &str, steps: i64) {
        sqlx::query("INSERT INTO step_logs (user_id, log_date, steps) VALUES (?, ?, ?)")
            .bind(user)
            .bind(date)
            .bind(steps)
            .execute(&self.db.pool)
            .await
            .expect("insert step log");
    }

    pub async fn log_sleep(&self, user: i64, date: &str, hours: f64, quality: Option<i64>) {
        sqlx::query(
            "INSERT INTO sleep_logs (user_id, log_date, hours_slept, sleep_quality) VALUES (?, ?, ?, ?)",
        )
        .bind(user)
        .bind(date)
        .bind(hours)
        .bind(quality)
        .execute(&self.db.pool)
        .await
        .expect("insert sleep log");
    }

    pub async fn log_measurement(&self, user: i64, date: &str, m: Measurement) {
        sqlx::query(
            "INSERT INTO body_measurements \
             (user_id, measurement_date, weight_kg, body_fat_percentage, bicep_left_cm, bicep_right_cm) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user)
        .bind(date)
        .bind(m.weight_kg)
        .bind(m.body_fat)
        .bind(m.bicep_left)
        .bind(m.bicep_right)
        .execute(&self.db.pool)
        .await
        .expect("insert measurement");
    }

    pub async fn add_session(
        &self,
        user: i64,
        date: &str,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> i64 {
        sqlx::query(
            "INSERT INTO workout_sessions (user_id, session_date, start_time, end_time) VALUES (?, ?, ?, ?)",
        )
        .bind(user)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .execute(&self.db.pool)
        .await
        .expect("insert session")
        .last_insert_rowid()
    }

    pub async fn add_set(&self, session_id: i64, weight_kg: f64, reps: i64) {
        sqlx::query("INSERT INTO workout_sets (session_id, weight_kg, reps) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(weight_kg)
            .bind(reps)
            .execute(&self.db.pool)
            .await
            .expect("insert set");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Measurement {
    pub weight_kg: Option<f64>,
    pub body_fat: Option<f64>,
    pub bicep_left: Option<f64>,
    pub bicep_right: Option<f64>,
}

pub fn d(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}
