use thiserror::Error;

/// Errors raised while resolving metrics and correlating their series
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Unknown metric: {metric_id}")]
    UnknownMetric { metric_id: String },

    #[error("Insufficient data: {common_points} common points (minimum {minimum})", minimum = crate::domain::analytics::alignment::MIN_COMMON_POINTS)]
    InsufficientData { common_points: usize },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AnalyticsError {
    pub fn unknown_metric(metric_id: impl Into<String>) -> Self {
        Self::UnknownMetric {
            metric_id: metric_id.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// True for failures caused by the caller rather than by storage.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
