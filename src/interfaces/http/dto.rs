//! Request parameters and JSON response bodies of the HTTP boundary.

use crate::application::analytics::MetricDataBatch;
use crate::domain::analytics::alignment::ScatterPoint;
use crate::domain::analytics::correlation::{CorrelationResult, Interpretation};
use crate::domain::analytics::series::DataPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /data` query string
#[derive(Debug, Default, Deserialize)]
pub struct DataParams {
    pub metrics: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DataParams {
    /// Non-blank ids of the comma-separated `metrics` parameter
    pub fn metric_ids(&self) -> Vec<String> {
        self.metrics
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `GET /correlation` query string
#[derive(Debug, Default, Deserialize)]
pub struct CorrelationParams {
    pub metric1: Option<String>,
    pub metric2: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One entry of the `/data` object: the series, or why it is missing.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SeriesEntry {
    Points(Vec<DataPoint>),
    Error { error: String },
}

pub type MetricDataResponse = BTreeMap<String, SeriesEntry>;

pub fn metric_data_response(batch: &MetricDataBatch) -> MetricDataResponse {
    batch
        .entries()
        .iter()
        .map(|entry| {
            let body = match &entry.outcome {
                Ok(series) => SeriesEntry::Points(series.points().to_vec()),
                Err(e) => SeriesEntry::Error {
                    error: e.to_string(),
                },
            };
            (entry.metric_id.clone(), body)
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CorrelationResponse {
    Computed {
        correlation: f64,
        interpretation: Interpretation,
        common_points: usize,
        scatter_data: Vec<ScatterPoint>,
    },
    Insufficient {
        correlation: Option<f64>,
        message: String,
        common_points: usize,
    },
}

impl From<CorrelationResult> for CorrelationResponse {
    fn from(result: CorrelationResult) -> Self {
        match (result.coefficient, result.interpretation) {
            (Some(correlation), Some(interpretation)) => CorrelationResponse::Computed {
                correlation,
                interpretation,
                common_points: result.sample_count,
                scatter_data: result.scatter_points,
            },
            _ => CorrelationResponse::Insufficient {
                correlation: None,
                message: result.message.unwrap_or_default(),
                common_points: result.sample_count,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
}
