//! Push-based observability for GymGraph
//!
//! This module provides observability through **outbound data only**. The
//! HTTP surface serves analytics, never metrics. Counters are pushed as
//! periodic structured JSON logs to stdout (for Loki, Fluentd, CloudWatch).

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
