use crate::domain::analytics::catalog::MetricDescriptor;
use crate::interfaces::http::AppState;
use crate::interfaces::http::dto::{
    CorrelationParams, CorrelationResponse, DataParams, HealthResponse, MetricDataResponse,
    metric_data_response,
};
use crate::interfaces::http::error::ApiError;
use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;

const NO_METRICS: &str = "No metrics specified";
const TWO_METRICS_REQUIRED: &str = "Se requieren dos métricas";

pub async fn list_metrics(State(state): State<AppState>) -> Json<Vec<MetricDescriptor>> {
    Json(state.analytics.list_metrics())
}

pub async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Result<Json<MetricDataResponse>, ApiError> {
    let metric_ids = params.metric_ids();
    if metric_ids.is_empty() {
        return Err(ApiError::bad_request(NO_METRICS));
    }

    let (default_start, default_end) = state.windows.data_window(state.today());
    let start = parse_date("start_date", params.start_date.as_deref())?.unwrap_or(default_start);
    let end = parse_date("end_date", params.end_date.as_deref())?.unwrap_or(default_end);

    let batch = state
        .analytics
        .get_metric_data(&metric_ids, start, end)
        .await?;
    Ok(Json(metric_data_response(&batch)))
}

pub async fn get_correlation(
    State(state): State<AppState>,
    Query(params): Query<CorrelationParams>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let (Some(metric1), Some(metric2)) = (
        non_blank(params.metric1.as_deref()),
        non_blank(params.metric2.as_deref()),
    ) else {
        return Err(ApiError::bad_request(TWO_METRICS_REQUIRED));
    };

    let (default_start, default_end) = state.windows.correlation_window(state.today());
    let start = parse_date("start_date", params.start_date.as_deref())?.unwrap_or(default_start);
    let end = parse_date("end_date", params.end_date.as_deref())?.unwrap_or(default_end);

    let result = state
        .analytics
        .get_correlation(metric1, metric2, start, end)
        .await?;
    Ok(Json(result.into()))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        app: "GymGraph",
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Absent and empty values both mean "use the default".
fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            ApiError::bad_request(format!(
                "Invalid {}: '{}' (expected YYYY-MM-DD)",
                name, raw
            ))
        })
}
