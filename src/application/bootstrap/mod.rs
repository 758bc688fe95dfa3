pub mod persistence;
pub mod services;

use anyhow::Result;

use crate::config::Config;
pub use persistence::{PersistenceBootstrap, PersistenceHandle};
pub use services::{ServicesBootstrap, ServicesHandle};

/// Everything a front end needs, wired once at startup.
pub struct Runtime {
    pub persistence: PersistenceHandle,
    pub services: ServicesHandle,
}

impl Runtime {
    pub async fn init(config: &Config) -> Result<Self> {
        let persistence = PersistenceBootstrap::init(&config.database).await?;
        let services = ServicesBootstrap::init(config, &persistence)?;
        Ok(Self {
            persistence,
            services,
        })
    }
}
