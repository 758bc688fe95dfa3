use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Decimal places kept on every emitted series value.
pub const SERIES_PRECISION: u32 = 2;

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// One value of a metric on one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Date-ordered, date-unique values of one metric.
///
/// Days without data are absent, never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    metric_id: String,
    points: Vec<DataPoint>,
}

impl TimeSeries {
    pub fn empty(metric_id: impl Into<String>) -> Self {
        Self {
            metric_id: metric_id.into(),
            points: Vec::new(),
        }
    }

    /// Build a series from per-day aggregates.
    ///
    /// Null aggregates are dropped, zero is kept. Values are rounded to
    /// [`SERIES_PRECISION`] and dates outside `[start, end]` are discarded.
    /// If a date repeats, the later value wins.
    pub fn from_daily_values<I>(
        metric_id: impl Into<String>,
        values: I,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let metric_id = metric_id.into();
        let mut by_date = BTreeMap::new();

        for (date, value) in values {
            let Some(value) = value else { continue };
            if date < start || date > end || !value.is_finite() {
                continue;
            }
            if by_date
                .insert(date, round_to(value, SERIES_PRECISION))
                .is_some()
            {
                warn!("Series {}: duplicate value for {}, keeping the last", metric_id, date);
            }
        }

        Self {
            metric_id,
            points: by_date
                .into_iter()
                .map(|(date, value)| DataPoint { date, value })
                .collect(),
        }
    }

    pub fn metric_id(&self) -> &str {
        &self.metric_id
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }
}
