//! Analytics configuration parsing from environment variables.
//!
//! This module handles the user scope, the default date windows of the
//! data and correlation requests, and an optional catalog override.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use std::env;
use std::path::PathBuf;

/// Longest accepted default window (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Analytics environment configuration
#[derive(Debug, Clone)]
pub struct AnalyticsEnvConfig {
    pub default_user_id: i64,
    pub data_window_days: i64,
    pub correlation_window_days: i64,
    pub catalog_path: Option<PathBuf>,
}

impl Default for AnalyticsEnvConfig {
    fn default() -> Self {
        Self {
            default_user_id: 1,
            data_window_days: 30,
            correlation_window_days: 90,
            catalog_path: None,
        }
    }
}

impl AnalyticsEnvConfig {
    pub fn from_env() -> Result<Self> {
        let data_window_days = Self::parse_i64("DATA_WINDOW_DAYS", 30)?;
        let correlation_window_days = Self::parse_i64("CORRELATION_WINDOW_DAYS", 90)?;
        if data_window_days < 0 || correlation_window_days < 0 {
            anyhow::bail!("DATA_WINDOW_DAYS and CORRELATION_WINDOW_DAYS must not be negative");
        }
        if data_window_days > MAX_WINDOW_DAYS || correlation_window_days > MAX_WINDOW_DAYS {
            anyhow::bail!(
                "DATA_WINDOW_DAYS and CORRELATION_WINDOW_DAYS must be at most {}",
                MAX_WINDOW_DAYS
            );
        }

        Ok(Self {
            default_user_id: Self::parse_i64("DEFAULT_USER_ID", 1)?,
            data_window_days,
            correlation_window_days,
            catalog_path: env::var("METRIC_CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// `[today - DATA_WINDOW_DAYS, today]`
    pub fn data_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (window_start(today, self.data_window_days), today)
    }

    /// `[today - CORRELATION_WINDOW_DAYS, today]`
    pub fn correlation_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (window_start(today, self.correlation_window_days), today)
    }

    fn parse_i64(key: &str, default: i64) -> Result<i64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<i64>()
            .context(format!("Failed to parse {}", key))
    }
}

/// Saturates at the earliest representable date; negative spans count as zero.
fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    let days = u64::try_from(days).unwrap_or(0);
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}
