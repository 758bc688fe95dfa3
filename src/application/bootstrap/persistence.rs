use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::DatabaseEnvConfig;
use crate::domain::repositories::MetricStore;
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::SqliteMetricStore;

pub struct PersistenceHandle {
    pub db: Database,
    pub metric_store: Arc<dyn MetricStore>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &DatabaseEnvConfig) -> Result<PersistenceHandle> {
        info!("Initializing Database at {}", config.url);

        let db = Database::new(&config.url, config.max_connections)
            .await
            .context("Failed to initialize database")?;

        let metric_store = Arc::new(SqliteMetricStore::new(db.pool.clone()));

        Ok(PersistenceHandle { db, metric_store })
    }
}
