//! Push-based metrics reporter for GymGraph
//!
//! Periodically outputs query and correlation counters as structured JSON
//! to stdout.
//!
//! **Security**: This system only SENDS data, never accepts requests.

use crate::domain::analytics::catalog::MetricCatalog;
use crate::infrastructure::observability::metrics::{CORRELATION_OUTCOMES, Metrics};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub queries: QuerySnapshot,
    pub correlations: BTreeMap<String, u64>,
}

#[derive(Serialize)]
pub struct QuerySnapshot {
    pub total: u64,
    pub unknown_metric: u64,
    /// Only metrics queried at least once
    pub by_metric: BTreeMap<String, u64>,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
/// No HTTP server, no incoming connections - only outbound data.
pub struct MetricsReporter {
    catalog: Arc<MetricCatalog>,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    /// Create a new metrics reporter
    ///
    /// # Arguments
    /// * `catalog` - Catalog whose ids are reported
    /// * `metrics` - Prometheus metrics shared with the query engine
    /// * `interval_seconds` - How often to output metrics (default: 60)
    pub fn new(catalog: Arc<MetricCatalog>, metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            catalog,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Use a special prefix so logs can be easily filtered
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Queries: {} | Unknown: {} | Uptime: {}s",
                        snapshot.queries.total,
                        snapshot.queries.unknown_metric,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
            debug!("Prometheus exposition:\n{}", self.metrics.render());
        }
    }

    /// Collect current metrics snapshot
    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let by_metric: BTreeMap<String, u64> = self
            .catalog
            .ids()
            .map(|id| (id.to_string(), self.metrics.series_query_count(id)))
            .filter(|(_, count)| *count > 0)
            .collect();

        let correlations = CORRELATION_OUTCOMES
            .iter()
            .map(|outcome| (outcome.to_string(), self.metrics.correlation_count(outcome)))
            .collect();

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            queries: QuerySnapshot {
                total: by_metric.values().sum(),
                unknown_metric: self.metrics.unknown_metric_total.get() as u64,
                by_metric,
            },
            correlations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot_collection() {
        let catalog = Arc::new(MetricCatalog::builtin().expect("Failed to load catalog"));
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_series_query("calories");
        metrics.inc_series_query("calories");
        metrics.inc_series_query("weight");
        metrics.inc_unknown_metric();
        metrics.inc_correlations("computed");

        let reporter = MetricsReporter::new(catalog, metrics, 60);
        let snapshot = reporter.collect_snapshot();

        assert_eq!(snapshot.queries.total, 3);
        assert_eq!(snapshot.queries.unknown_metric, 1);
        assert_eq!(snapshot.queries.by_metric.get("calories"), Some(&2));
        assert!(!snapshot.queries.by_metric.contains_key("steps"));
        assert_eq!(snapshot.correlations.get("computed"), Some(&1));
        assert_eq!(snapshot.correlations.get("failed"), Some(&0));
        assert!(!snapshot.timestamp.is_empty());
    }

    #[test]
    fn test_snapshot_refreshes_uptime_in_exposition() {
        let catalog = Arc::new(MetricCatalog::builtin().expect("Failed to load catalog"));
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_series_query("steps");

        let reporter = MetricsReporter::new(catalog, metrics.clone(), 60);
        reporter.collect_snapshot();

        let exposition = metrics.render();
        assert!(exposition.contains("gymgraph_uptime_seconds"));
        assert!(exposition.contains("gymgraph_series_queries_total{metric=\"steps\"} 1"));
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = MetricsSnapshot {
            timestamp: "2026-01-10T10:00:00Z".to_string(),
            uptime_seconds: 3600,
            version: "0.4.2".to_string(),
            queries: QuerySnapshot {
                total: 4,
                unknown_metric: 0,
                by_metric: BTreeMap::from([("sleep_hours".to_string(), 4)]),
            },
            correlations: BTreeMap::from([("insufficient".to_string(), 2)]),
        };

        let json = serde_json::to_string(&snapshot).expect("Failed to serialize");
        assert!(json.contains("sleep_hours"));
        assert!(json.contains("\"insufficient\":2"));
    }
}
