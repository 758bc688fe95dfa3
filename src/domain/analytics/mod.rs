//! Cross-domain metric analytics: catalog, series, alignment, correlation.

pub mod alignment;
pub mod catalog;
pub mod correlation;
pub mod series;

pub use alignment::{AlignedSeriesPair, MIN_COMMON_POINTS, ScatterPoint, align};
pub use catalog::{AggregationRule, MetricCatalog, MetricCategory, MetricDescriptor};
pub use correlation::{CorrelationResult, Interpretation, interpret, pearson};
pub use series::{DataPoint, TimeSeries};
