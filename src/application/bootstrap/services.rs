use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::application::analytics::{AnalyticsService, MetricQueryEngine};
use crate::application::bootstrap::persistence::PersistenceHandle;
use crate::config::Config;
use crate::domain::analytics::catalog::MetricCatalog;
use crate::infrastructure::observability::{Metrics, MetricsReporter};

pub struct ServicesHandle {
    pub catalog: Arc<MetricCatalog>,
    pub metrics: Metrics,
    pub analytics: Arc<AnalyticsService>,
}

impl ServicesHandle {
    /// Reporter for the push-based metrics loop, when enabled.
    pub fn reporter(&self, config: &Config) -> Option<MetricsReporter> {
        config.observability.enabled.then(|| {
            MetricsReporter::new(
                self.catalog.clone(),
                self.metrics.clone(),
                config.observability.interval_seconds,
            )
        })
    }
}

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    pub fn init(config: &Config, persistence: &PersistenceHandle) -> Result<ServicesHandle> {
        // 1. Catalog, loaded once and shared read-only
        let catalog = match &config.analytics.catalog_path {
            Some(path) => MetricCatalog::from_path(path)?,
            None => MetricCatalog::builtin()?,
        };
        let catalog = Arc::new(catalog);
        info!("Metric catalog loaded: {} metrics", catalog.len());

        // 2. Metrics
        let metrics = Metrics::new().context("Failed to register metrics")?;

        // 3. Engine and orchestrator
        let engine = MetricQueryEngine::new(catalog.clone(), persistence.metric_store.clone())
            .with_metrics(metrics.clone());
        let analytics = Arc::new(AnalyticsService::new(
            engine,
            config.user_id(),
            metrics.clone(),
        ));

        Ok(ServicesHandle {
            catalog,
            metrics,
            analytics,
        })
    }
}
