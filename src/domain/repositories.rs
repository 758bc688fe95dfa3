//! Repository Pattern Abstractions
//!
//! The analytics engine only reads. It needs one thing from storage: run a
//! per-day aggregate query for one user over an inclusive date window and
//! hand back `(date, value)` rows.
//!
//! # Design
//!
//! - `MetricStore`: executes a planned [`DailyQuery`] and returns raw
//!   [`DailyRow`]s. Null aggregates are returned as `None`; turning rows
//!   into a clean series is the engine's job.
//!
//! # Current Implementation
//!
//! `SqliteMetricStore` runs queries on a `sqlx` SQLite pool, acquiring a
//! connection per query.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Identity whose records a query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl Default for UserId {
    /// The single local user.
    fn default() -> Self {
        UserId(1)
    }
}

/// A planned per-day aggregate query.
///
/// `sql` takes three positional parameters: user id, start date and end
/// date (ISO-8601, inclusive). It yields a `date` TEXT column and a
/// nullable `value` REAL column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuery {
    pub sql: String,
    pub user: UserId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One aggregated row as stored; `value` is `None` for a SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: String,
    pub value: Option<f64>,
}

/// Read access to daily aggregates
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn query_daily(&self, query: &DailyQuery) -> Result<Vec<DailyRow>>;
}
