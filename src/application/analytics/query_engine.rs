use crate::application::analytics::sql_plan;
use crate::domain::analytics::catalog::MetricCatalog;
use crate::domain::analytics::series::TimeSeries;
use crate::domain::errors::AnalyticsError;
use crate::domain::repositories::{DailyQuery, DailyRow, MetricStore, UserId};
use crate::infrastructure::observability::Metrics;
use anyhow::Context;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Resolves a metric id into a clean daily series by running the metric's
/// aggregation rule against storage.
#[derive(Clone)]
pub struct MetricQueryEngine {
    catalog: Arc<MetricCatalog>,
    store: Arc<dyn MetricStore>,
    metrics: Option<Metrics>,
}

impl MetricQueryEngine {
    pub fn new(catalog: Arc<MetricCatalog>, store: Arc<dyn MetricStore>) -> Self {
        Self {
            catalog,
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    /// Fetch the series of `metric_id` for `user` over `[start, end]`.
    ///
    /// Unregistered ids fail with [`AnalyticsError::UnknownMetric`]; storage
    /// failures surface as [`AnalyticsError::Storage`].
    pub async fn fetch_series(
        &self,
        metric_id: &str,
        user: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::invalid_request(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }

        let rule = self.catalog.rule(metric_id)?;
        let query = DailyQuery {
            sql: sql_plan::plan(rule),
            user,
            start,
            end,
        };

        let started = Instant::now();
        let rows = self
            .store
            .query_daily(&query)
            .await
            .with_context(|| format!("Failed to fetch series for metric {}", metric_id))?;
        let elapsed = started.elapsed();

        if let Some(metrics) = &self.metrics {
            metrics.inc_series_query(metric_id);
            metrics.observe_storage_latency(rule.shape_name(), elapsed.as_secs_f64());
        }
        debug!(
            "Metric {} ({}): {} rows in {:?}",
            metric_id,
            rule.shape_name(),
            rows.len(),
            elapsed
        );

        let values = rows
            .into_iter()
            .map(|row| parse_row(metric_id, row))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(TimeSeries::from_daily_values(metric_id, values, start, end))
    }
}

fn parse_row(metric_id: &str, row: DailyRow) -> anyhow::Result<(NaiveDate, Option<f64>)> {
    // Stored dates may carry a time part; the calendar date is the first 10 chars.
    let date_part = row.date.get(..10).unwrap_or(&row.date);
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").with_context(|| {
        format!("Invalid stored date '{}' for metric {}", row.date, metric_id)
    })?;
    Ok((date, row.value))
}
