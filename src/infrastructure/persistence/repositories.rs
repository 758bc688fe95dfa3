use crate::domain::repositories::{DailyQuery, DailyRow, MetricStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::error;

pub struct SqliteMetricStore {
    pool: SqlitePool,
}

impl SqliteMetricStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricStore for SqliteMetricStore {
    async fn query_daily(&self, query: &DailyQuery) -> Result<Vec<DailyRow>> {
        // The connection goes back to the pool when `conn` drops, on every path.
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;

        let rows = match sqlx::query(&query.sql)
            .bind(query.user.0)
            .bind(query.start.format("%Y-%m-%d").to_string())
            .bind(query.end.format("%Y-%m-%d").to_string())
            .fetch_all(&mut *conn)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!("Daily aggregate query failed: {} | sql: {}", e, query.sql);
                return Err(e).context("Failed to run daily aggregate query");
            }
        };

        let mut daily = Vec::with_capacity(rows.len());
        for row in rows {
            daily.push(DailyRow {
                date: row.try_get("date")?,
                value: row.try_get("value")?,
            });
        }
        Ok(daily)
    }
}
