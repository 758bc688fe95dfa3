//! Metric catalog
//!
//! Static registry of every metric the engine can compute. The catalog is
//! plain data (see `catalog.toml`) loaded once at startup and shared as an
//! immutable `Arc<MetricCatalog>`; adding a metric is a catalog edit.

use crate::domain::errors::AnalyticsError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

/// Domain a metric belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Nutrition,
    Measurements,
    SelfCare,
    Training,
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricCategory::Nutrition => write!(f, "Nutrition"),
            MetricCategory::Measurements => write!(f, "Measurements"),
            MetricCategory::SelfCare => write!(f, "Self care"),
            MetricCategory::Training => write!(f, "Training"),
        }
    }
}

/// Which table of a joined rule a value term reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSide {
    Log,
    Joined,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnRef {
    pub side: JoinSide,
    pub column: String,
}

/// Per-day reduction applied to a joined rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinReducer {
    #[default]
    Sum,
    Count,
}

fn default_user_column() -> String {
    "user_id".to_string()
}

/// How a metric is aggregated into one value per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AggregationRule {
    /// Sum (or count) of the product of `terms` over `log JOIN joined`,
    /// grouped by the log date.
    JoinedDailySum {
        log_table: String,
        date_column: String,
        joined_table: String,
        log_key: String,
        joined_key: String,
        terms: Vec<ColumnRef>,
        #[serde(default)]
        reducer: JoinReducer,
        #[serde(default = "default_user_column")]
        user_column: String,
    },
    /// Value stored directly, one row per day.
    DailyValue {
        table: String,
        date_column: String,
        value_column: String,
        #[serde(default = "default_user_column")]
        user_column: String,
    },
    /// Optional stored value; only rows where it was recorded count.
    RecordedDailyValue {
        table: String,
        date_column: String,
        value_column: String,
        #[serde(default = "default_user_column")]
        user_column: String,
    },
    /// Mean of a left/right pair; a missing side counts as 0 only when
    /// the other side is present.
    BilateralAverage {
        table: String,
        date_column: String,
        left_column: String,
        right_column: String,
        #[serde(default = "default_user_column")]
        user_column: String,
    },
    /// Minutes between two timestamps of the same row.
    SessionDuration {
        table: String,
        date_column: String,
        start_column: String,
        end_column: String,
        #[serde(default = "default_user_column")]
        user_column: String,
    },
}

impl AggregationRule {
    /// Short label used for logging and latency metrics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            AggregationRule::JoinedDailySum { .. } => "joined_daily_sum",
            AggregationRule::DailyValue { .. } => "daily_value",
            AggregationRule::RecordedDailyValue { .. } => "recorded_daily_value",
            AggregationRule::BilateralAverage { .. } => "bilateral_average",
            AggregationRule::SessionDuration { .. } => "session_duration",
        }
    }

    fn identifiers(&self) -> Vec<&str> {
        match self {
            AggregationRule::JoinedDailySum {
                log_table,
                date_column,
                joined_table,
                log_key,
                joined_key,
                terms,
                user_column,
                ..
            } => {
                let mut ids = vec![
                    log_table.as_str(),
                    date_column.as_str(),
                    joined_table.as_str(),
                    log_key.as_str(),
                    joined_key.as_str(),
                    user_column.as_str(),
                ];
                ids.extend(terms.iter().map(|t| t.column.as_str()));
                ids
            }
            AggregationRule::DailyValue {
                table,
                date_column,
                value_column,
                user_column,
            }
            | AggregationRule::RecordedDailyValue {
                table,
                date_column,
                value_column,
                user_column,
            } => vec![
                table.as_str(),
                date_column.as_str(),
                value_column.as_str(),
                user_column.as_str(),
            ],
            AggregationRule::BilateralAverage {
                table,
                date_column,
                left_column,
                right_column,
                user_column,
            } => vec![
                table.as_str(),
                date_column.as_str(),
                left_column.as_str(),
                right_column.as_str(),
                user_column.as_str(),
            ],
            AggregationRule::SessionDuration {
                table,
                date_column,
                start_column,
                end_column,
                user_column,
            } => vec![
                table.as_str(),
                date_column.as_str(),
                start_column.as_str(),
                end_column.as_str(),
                user_column.as_str(),
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        for ident in self.identifiers() {
            if !is_sql_identifier(ident) {
                anyhow::bail!("'{}' is not a valid SQL identifier", ident);
            }
        }
        if let AggregationRule::JoinedDailySum { terms, reducer, .. } = self {
            if terms.is_empty() {
                anyhow::bail!("joined_daily_sum rule needs at least one term");
            }
            if *reducer == JoinReducer::Count && terms.len() != 1 {
                anyhow::bail!("count reducer takes exactly one term");
            }
        }
        Ok(())
    }
}

fn is_sql_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Public description of a metric, as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub category: MetricCategory,
    pub unit: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    name: String,
    category: MetricCategory,
    unit: String,
    color: String,
    rule: AggregationRule,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    metric: Vec<CatalogEntry>,
}

#[derive(Debug, Clone)]
struct CatalogRecord {
    descriptor: MetricDescriptor,
    rule: AggregationRule,
}

/// Immutable, ordered registry of metrics.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    records: Vec<CatalogRecord>,
    index: HashMap<String, usize>,
}

impl MetricCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG).context("Failed to load built-in metric catalog")
    }

    /// Load a catalog from a TOML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metric catalog: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse metric catalog: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Invalid catalog TOML")?;

        let mut records = Vec::with_capacity(file.metric.len());
        let mut index = HashMap::with_capacity(file.metric.len());

        for entry in file.metric {
            if entry.id.trim().is_empty() {
                anyhow::bail!("Metric with empty id in catalog");
            }
            entry
                .rule
                .validate()
                .with_context(|| format!("Invalid rule for metric '{}'", entry.id))?;
            if index.insert(entry.id.clone(), records.len()).is_some() {
                anyhow::bail!("Duplicate metric id in catalog: {}", entry.id);
            }
            records.push(CatalogRecord {
                descriptor: MetricDescriptor {
                    id: entry.id,
                    display_name: entry.name,
                    category: entry.category,
                    unit: entry.unit,
                    color: entry.color,
                },
                rule: entry.rule,
            });
        }

        Ok(Self { records, index })
    }

    /// All metrics in declaration order.
    pub fn list(&self) -> Vec<MetricDescriptor> {
        self.records.iter().map(|r| r.descriptor.clone()).collect()
    }

    pub fn describe(&self, metric_id: &str) -> Result<&MetricDescriptor, AnalyticsError> {
        self.record(metric_id).map(|r| &r.descriptor)
    }

    pub fn contains(&self, metric_id: &str) -> bool {
        self.index.contains_key(metric_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.descriptor.id.as_str())
    }

    pub(crate) fn rule(&self, metric_id: &str) -> Result<&AggregationRule, AnalyticsError> {
        self.record(metric_id).map(|r| &r.rule)
    }

    fn record(&self, metric_id: &str) -> Result<&CatalogRecord, AnalyticsError> {
        self.index
            .get(metric_id)
            .map(|&i| &self.records[i])
            .ok_or_else(|| AnalyticsError::unknown_metric(metric_id))
    }
}
