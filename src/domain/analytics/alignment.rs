use crate::domain::analytics::series::TimeSeries;
use crate::domain::errors::AnalyticsError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Fewest shared dates for which a correlation carries information.
pub const MIN_COMMON_POINTS: usize = 3;

/// Two value sequences restricted to the dates both series share.
///
/// Index `i` of `left`, `right` and `dates` refer to the same day, and
/// dates are strictly ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeriesPair {
    dates: Vec<NaiveDate>,
    left: Vec<f64>,
    right: Vec<f64>,
}

/// One aligned pair, ready for a scatter plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
}

impl AlignedSeriesPair {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn left(&self) -> &[f64] {
        &self.left
    }

    pub fn right(&self) -> &[f64] {
        &self.right
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn scatter_points(&self) -> Vec<ScatterPoint> {
        self.dates
            .iter()
            .zip(self.left.iter().zip(self.right.iter()))
            .map(|(&date, (&x, &y))| ScatterPoint { x, y, date })
            .collect()
    }
}

/// Number of dates present in both series.
pub fn common_point_count(a: &TimeSeries, b: &TimeSeries) -> usize {
    let right: HashMap<NaiveDate, f64> = b.points().iter().map(|p| (p.date, p.value)).collect();
    a.points()
        .iter()
        .filter(|p| right.contains_key(&p.date))
        .count()
}

/// Restrict `a` and `b` to their common dates, in ascending date order.
///
/// Fails with [`AnalyticsError::InsufficientData`] when fewer than
/// [`MIN_COMMON_POINTS`] dates are shared.
pub fn align(a: &TimeSeries, b: &TimeSeries) -> Result<AlignedSeriesPair, AnalyticsError> {
    let right: HashMap<NaiveDate, f64> = b.points().iter().map(|p| (p.date, p.value)).collect();

    let mut common: Vec<(NaiveDate, f64, f64)> = a
        .points()
        .iter()
        .filter_map(|p| right.get(&p.date).map(|&y| (p.date, p.value, y)))
        .collect();

    if common.len() < MIN_COMMON_POINTS {
        return Err(AnalyticsError::InsufficientData {
            common_points: common.len(),
        });
    }

    // Series are already ordered, but alignment must not depend on it.
    common.sort_by_key(|(date, _, _)| *date);

    let mut pair = AlignedSeriesPair {
        dates: Vec::with_capacity(common.len()),
        left: Vec::with_capacity(common.len()),
        right: Vec::with_capacity(common.len()),
    };
    for (date, x, y) in common {
        pair.dates.push(date);
        pair.left.push(x);
        pair.right.push(y);
    }
    Ok(pair)
}
