//! Metric querying and correlation over stored tracking logs.

pub mod query_engine;
pub mod service;
pub mod sql_plan;

pub use query_engine::MetricQueryEngine;
pub use service::{AnalyticsService, MetricDataBatch, MetricDataEntry};
