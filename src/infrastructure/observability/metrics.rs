//! Prometheus metrics definitions for GymGraph
//!
//! All metrics use the `gymgraph_` prefix and are read-only.

use prometheus::{
    Counter, CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Correlation request outcomes tracked by [`Metrics::inc_correlations`].
pub const CORRELATION_OUTCOMES: [&str; 3] = ["computed", "insufficient", "failed"];

/// Prometheus metrics for the analytics engine
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Series fetched per metric id
    pub series_queries_total: CounterVec,
    /// Requests naming a metric absent from the catalog
    pub unknown_metric_total: Counter,
    /// Correlation requests by outcome
    pub correlations_total: CounterVec,
    /// Storage query latency by aggregation shape
    pub storage_query_seconds: HistogramVec,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let series_queries_total = CounterVec::new(
            Opts::new("gymgraph_series_queries_total", "Series fetched per metric"),
            &["metric"],
        )?;
        registry.register(Box::new(series_queries_total.clone()))?;

        let unknown_metric_total = Counter::with_opts(Opts::new(
            "gymgraph_unknown_metric_total",
            "Requests naming an unregistered metric",
        ))?;
        registry.register(Box::new(unknown_metric_total.clone()))?;

        let correlations_total = CounterVec::new(
            Opts::new("gymgraph_correlations_total", "Correlation requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(correlations_total.clone()))?;

        let storage_query_seconds = HistogramVec::new(
            HistogramOpts::new(
                "gymgraph_storage_query_seconds",
                "Daily aggregate query latency in seconds",
            )
            .buckets(vec![0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["shape"],
        )?;
        registry.register(Box::new(storage_query_seconds.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "gymgraph_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            series_queries_total,
            unknown_metric_total,
            correlations_total,
            storage_query_seconds,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_series_query(&self, metric: &str) {
        self.series_queries_total.with_label_values(&[metric]).inc();
    }

    pub fn series_query_count(&self, metric: &str) -> u64 {
        self.series_queries_total.with_label_values(&[metric]).get() as u64
    }

    pub fn inc_unknown_metric(&self) {
        self.unknown_metric_total.inc();
    }

    pub fn inc_correlations(&self, outcome: &str) {
        self.correlations_total.with_label_values(&[outcome]).inc();
    }

    pub fn correlation_count(&self, outcome: &str) -> u64 {
        self.correlations_total.with_label_values(&[outcome]).get() as u64
    }

    pub fn observe_storage_latency(&self, shape: &str, seconds: f64) {
        self.storage_query_seconds
            .with_label_values(&[shape])
            .observe(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.uptime_seconds.set(1.0);
        assert!(metrics.render().contains("gymgraph_"));
    }

    #[test]
    fn test_series_query_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_series_query("calories");
        metrics.inc_series_query("calories");
        metrics.inc_series_query("weight");
        assert_eq!(metrics.series_query_count("calories"), 2);
        assert_eq!(metrics.series_query_count("weight"), 1);

        let output = metrics.render();
        assert!(output.contains("gymgraph_series_queries_total"));
        assert!(output.contains("calories"));
    }

    #[test]
    fn test_correlation_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_correlations("computed");
        metrics.inc_correlations("insufficient");
        assert_eq!(metrics.correlation_count("computed"), 1);
        assert_eq!(metrics.correlation_count("failed"), 0);
    }

    #[test]
    fn test_storage_latency_histogram() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.observe_storage_latency("daily_value", 0.004);
        assert!(metrics.render().contains("gymgraph_storage_query_seconds"));
    }
}
