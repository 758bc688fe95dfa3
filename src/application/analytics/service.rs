use crate::application::analytics::query_engine::MetricQueryEngine;
use crate::domain::analytics::alignment::align;
use crate::domain::analytics::catalog::{MetricCatalog, MetricDescriptor};
use crate::domain::analytics::correlation::CorrelationResult;
use crate::domain::analytics::series::TimeSeries;
use crate::domain::errors::AnalyticsError;
use crate::domain::repositories::UserId;
use crate::infrastructure::observability::Metrics;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Outcome of one id inside a multi-metric request
#[derive(Debug)]
pub struct MetricDataEntry {
    pub metric_id: String,
    pub outcome: Result<TimeSeries, AnalyticsError>,
}

/// Per-id results of a multi-metric request, in request order.
#[derive(Debug, Default)]
pub struct MetricDataBatch {
    entries: Vec<MetricDataEntry>,
}

impl MetricDataBatch {
    pub fn entries(&self) -> &[MetricDataEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, metric_id: &str) -> Option<&Result<TimeSeries, AnalyticsError>> {
        self.entries
            .iter()
            .find(|e| e.metric_id == metric_id)
            .map(|e| &e.outcome)
    }

    pub fn series(&self, metric_id: &str) -> Option<&TimeSeries> {
        self.get(metric_id).and_then(|outcome| outcome.as_ref().ok())
    }
}

/// Facade over the query engine for a single, fixed user.
pub struct AnalyticsService {
    engine: MetricQueryEngine,
    user: UserId,
    metrics: Metrics,
}

impl AnalyticsService {
    pub fn new(engine: MetricQueryEngine, user: UserId, metrics: Metrics) -> Self {
        Self {
            engine,
            user,
            metrics,
        }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        self.engine.catalog()
    }

    pub fn list_metrics(&self) -> Vec<MetricDescriptor> {
        self.catalog().list()
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub async fn fetch_series(
        &self,
        metric_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, AnalyticsError> {
        let result = self.engine.fetch_series(metric_id, self.user, start, end).await;
        if let Err(AnalyticsError::UnknownMetric { .. }) = &result {
            self.metrics.inc_unknown_metric();
            warn!("Requested unknown metric: {}", metric_id);
        }
        result
    }

    /// Fetch every requested metric independently.
    ///
    /// Blank and repeated ids are skipped. An unknown id yields a per-id
    /// error entry; storage failures abort the whole batch.
    pub async fn get_metric_data(
        &self,
        metric_ids: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MetricDataBatch, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::invalid_request(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }

        let mut batch = MetricDataBatch::default();
        for metric_id in metric_ids.iter().map(|id| id.trim()) {
            if metric_id.is_empty() || batch.get(metric_id).is_some() {
                continue;
            }

            let outcome = match self.fetch_series(metric_id, start, end).await {
                Ok(series) => Ok(series),
                Err(e @ AnalyticsError::UnknownMetric { .. }) => Err(e),
                Err(e) => return Err(e),
            };
            batch.entries.push(MetricDataEntry {
                metric_id: metric_id.to_string(),
                outcome,
            });
        }
        Ok(batch)
    }

    /// Correlate two metrics over `[start, end]`.
    ///
    /// Too few shared dates is a data outcome (absent coefficient with a
    /// message), not an error.
    pub async fn get_correlation(
        &self,
        metric_a: &str,
        metric_b: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CorrelationResult, AnalyticsError> {
        let result = self.correlate(metric_a, metric_b, start, end).await;

        let outcome = match &result {
            Ok(r) if r.is_computed() => "computed",
            Ok(_) => "insufficient",
            Err(_) => "failed",
        };
        self.metrics.inc_correlations(outcome);
        result
    }

    async fn correlate(
        &self,
        metric_a: &str,
        metric_b: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CorrelationResult, AnalyticsError> {
        let series_a = self.fetch_series(metric_a, start, end).await?;
        let series_b = self.fetch_series(metric_b, start, end).await?;

        match align(&series_a, &series_b) {
            Ok(pair) => {
                let result = CorrelationResult::from_aligned(&pair);
                info!(
                    "Correlation {} vs {} ({} to {}): r={:?} over {} points",
                    metric_a, metric_b, start, end, result.coefficient, result.sample_count
                );
                Ok(result)
            }
            Err(AnalyticsError::InsufficientData { common_points }) => {
                info!(
                    "Correlation {} vs {}: only {} common points",
                    metric_a, metric_b, common_points
                );
                Ok(CorrelationResult::insufficient(common_points))
            }
            Err(e) => Err(e),
        }
    }
}
