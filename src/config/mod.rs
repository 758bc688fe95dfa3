//! Configuration module for GymGraph.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Database, Server, Analytics, and Observability.

mod analytics_config;
mod database_config;
mod observability_config;
mod server_config;

pub use analytics_config::AnalyticsEnvConfig;
pub use database_config::{DEFAULT_DATABASE_URL, DatabaseEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;

use crate::domain::repositories::UserId;
use anyhow::{Context, Result};

/// Main application configuration.
///
/// Aggregates all sub-configurations loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database: DatabaseEnvConfig,
    pub server: ServerEnvConfig,
    pub analytics: AnalyticsEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This orchestrates loading from all sub-config modules and composes
    /// them into a unified Config struct.
    pub fn from_env() -> Result<Self> {
        let database = DatabaseEnvConfig::from_env().context("Failed to load database config")?;
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let analytics =
            AnalyticsEnvConfig::from_env().context("Failed to load analytics config")?;
        let observability = ObservabilityEnvConfig::from_env()
            .context("Failed to load observability config")?;

        Ok(Self {
            database,
            server,
            analytics,
            observability,
        })
    }

    pub fn user_id(&self) -> UserId {
        UserId(self.analytics.default_user_id)
    }
}
