//! GymGraph Analyze - command line front end to the analytics engine
//!
//! Prints the same JSON documents as the HTTP API.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gymgraph::application::bootstrap::Runtime;
use gymgraph::config::Config;
use gymgraph::interfaces::http::dto::{CorrelationResponse, metric_data_response};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Cross-domain metric analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every metric in the catalog
    Metrics,
    /// Print daily series for one or more metrics
    Series {
        /// Comma-separated list of metric ids
        #[arg(short, long)]
        metrics: String,

        /// Start date (YYYY-MM-DD), default: DATA_WINDOW_DAYS ago
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), default: today
        #[arg(long)]
        end: Option<String>,
    },
    /// Correlate two metrics
    Correlate {
        /// First metric id (x axis)
        #[arg(long)]
        metric1: String,

        /// Second metric id (y axis)
        #[arg(long)]
        metric2: String,

        /// Start date (YYYY-MM-DD), default: CORRELATION_WINDOW_DAYS ago
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), default: today
        #[arg(long)]
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Setup logging on stderr, stdout carries the JSON
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let runtime = Runtime::init(&config).await?;
    let analytics = &runtime.services.analytics;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Metrics => print_json(&analytics.list_metrics())?,
        Commands::Series {
            metrics,
            start,
            end,
        } => {
            let ids: Vec<String> = metrics
                .split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
            if ids.is_empty() {
                anyhow::bail!("No metrics specified");
            }

            let (default_start, default_end) = config.analytics.data_window(today);
            let (start, end) = parse_date_range(start, end, default_start, default_end)?;
            info!("Fetching {:?} from {} to {}", ids, start, end);

            let batch = analytics.get_metric_data(&ids, start, end).await?;
            print_json(&metric_data_response(&batch))?;
        }
        Commands::Correlate {
            metric1,
            metric2,
            start,
            end,
        } => {
            let (default_start, default_end) = config.analytics.correlation_window(today);
            let (start, end) = parse_date_range(start, end, default_start, default_end)?;

            let result = analytics
                .get_correlation(&metric1, &metric2, start, end)
                .await?;
            print_json(&CorrelationResponse::from(result))?;
        }
    }

    runtime.persistence.db.pool.close().await;
    Ok(())
}

fn parse_date_range(
    start: Option<String>,
    end: Option<String>,
    default_start: NaiveDate,
    default_end: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let parse = |value: Option<String>, default: NaiveDate| -> Result<NaiveDate> {
        match value {
            Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
            None => Ok(default),
        }
    };
    Ok((parse(start, default_start)?, parse(end, default_end)?))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
