//! GymGraph Server - Headless analytics API
//!
//! Serves the metric catalog, daily series and correlations over HTTP.
//! Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! DATABASE_URL=sqlite://data/gymgraph.db cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - Listen address (default: 127.0.0.1:5000)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::Result;
use gymgraph::application::bootstrap::Runtime;
use gymgraph::config::Config;
use gymgraph::interfaces::http::{self, AppState};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("GymGraph Server {} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Database={}, User={}, Windows={}d/{}d",
        config.database.url,
        config.analytics.default_user_id,
        config.analytics.data_window_days,
        config.analytics.correlation_window_days
    );

    let runtime = Runtime::init(&config).await?;

    // Start metrics reporter if enabled
    match runtime.services.reporter(&config) {
        Some(reporter) => {
            tokio::spawn(async move {
                reporter.run().await;
            });
            info!(
                "Metrics reporter started (interval: {}s)",
                config.observability.interval_seconds
            );
        }
        None => info!("Metrics reporting disabled."),
    }

    let state = AppState::new(runtime.services.analytics.clone(), config.analytics.clone());
    http::serve(state, &config.server.socket_address(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received. Exiting...");
    })
    .await?;

    runtime.persistence.db.pool.close().await;
    Ok(())
}
