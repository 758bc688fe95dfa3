//! HTTP boundary of the analytics engine.
//!
//! Read-only JSON endpoints over the orchestrator:
//!
//! - `GET /metrics` lists the catalog
//! - `GET /data` returns daily series for several metrics
//! - `GET /correlation` correlates two metrics
//! - `GET /health` reports liveness

pub mod dto;
pub mod error;
pub mod handlers;

use crate::application::analytics::AnalyticsService;
use crate::config::AnalyticsEnvConfig;
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use chrono::NaiveDate;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<AnalyticsService>,
    /// Default request windows
    pub windows: AnalyticsEnvConfig,
    /// Pinned "today" for default windows; the local date when unset
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(analytics: Arc<AnalyticsService>, windows: AnalyticsEnvConfig) -> Self {
        Self {
            analytics,
            windows,
            today: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::list_metrics))
        .route("/data", get(handlers::get_data))
        .route("/correlation", get(handlers::get_correlation))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: &str, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("GymGraph analytics listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}
