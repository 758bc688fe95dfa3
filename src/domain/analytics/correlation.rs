//! Pearson correlation and its human-readable interpretation.

use crate::domain::analytics::alignment::{AlignedSeriesPair, MIN_COMMON_POINTS, ScatterPoint};
use crate::domain::analytics::series::round_to;
use serde::Serialize;
use statrs::statistics::{Data, Distribution};
use std::fmt;

/// Decimal places of a reported coefficient.
pub const COEFFICIENT_PRECISION: u32 = 4;

/// Pearson product-moment correlation of two equally long sequences.
///
/// Returns `0.0` when either sequence has zero variance or is empty: a
/// constant series has no computable linear relationship. Trailing values
/// of the longer slice are ignored.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];

    let (Some(mean_x), Some(mean_y)) = (
        Data::new(xs.to_vec()).mean(),
        Data::new(ys.to_vec()).mean(),
    ) else {
        return 0.0;
    };

    let mut numerator = 0.0;
    let mut sum_dx2 = 0.0;
    let mut sum_dy2 = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_dx2 += dx * dx;
        sum_dy2 += dy * dy;
    }

    let denominator = (sum_dx2 * sum_dy2).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (numerator / denominator).clamp(-1.0, 1.0)
}

/// Strength bucket of `|r|`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl Strength {
    pub fn from_coefficient(r: f64) -> Self {
        let abs_r = r.abs();
        if abs_r >= 0.9 {
            Strength::VeryStrong
        } else if abs_r >= 0.7 {
            Strength::Strong
        } else if abs_r >= 0.5 {
            Strength::Moderate
        } else if abs_r >= 0.3 {
            Strength::Weak
        } else {
            Strength::VeryWeak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::VeryStrong => "very strong",
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
            Strength::VeryWeak => "very weak or nonexistent",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
    None,
}

impl Direction {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            Direction::Positive
        } else if r < 0.0 {
            Direction::Negative
        } else {
            Direction::None
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Direction::Positive => "as one increases, the other tends to increase",
            Direction::Negative => "as one increases, the other tends to decrease",
            Direction::None => "no apparent linear relationship",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "positive"),
            Direction::Negative => write!(f, "negative"),
            Direction::None => Ok(()),
        }
    }
}

/// Readable summary of a coefficient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub strength: String,
    pub direction: String,
    pub explanation: String,
}

pub fn interpret(r: f64) -> Interpretation {
    let direction = Direction::from_coefficient(r);
    Interpretation {
        strength: Strength::from_coefficient(r).to_string(),
        direction: direction.to_string(),
        explanation: direction.explanation().to_string(),
    }
}

/// Outcome of correlating two metrics over a window.
///
/// `coefficient` is `None` when the series share too few dates; `message`
/// then says why.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationResult {
    pub coefficient: Option<f64>,
    pub sample_count: usize,
    pub interpretation: Option<Interpretation>,
    pub scatter_points: Vec<ScatterPoint>,
    pub message: Option<String>,
}

impl CorrelationResult {
    /// Correlate an aligned pair. The interpretation is derived from the
    /// full-precision coefficient; the reported one is rounded.
    pub fn from_aligned(pair: &AlignedSeriesPair) -> Self {
        let r = pearson(pair.left(), pair.right());
        Self {
            coefficient: Some(round_to(r, COEFFICIENT_PRECISION)),
            sample_count: pair.len(),
            interpretation: Some(interpret(r)),
            scatter_points: pair.scatter_points(),
            message: None,
        }
    }

    pub fn insufficient(common_points: usize) -> Self {
        Self {
            coefficient: None,
            sample_count: common_points,
            interpretation: None,
            scatter_points: Vec::new(),
            message: Some(format!(
                "Not enough overlapping data to compute a correlation (minimum {} points)",
                MIN_COMMON_POINTS
            )),
        }
    }

    pub fn is_computed(&self) -> bool {
        self.coefficient.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::alignment::align;
    use crate::domain::analytics::series::TimeSeries;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    fn series(id: &str, values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TimeSeries::from_daily_values(
            id,
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + chrono::Days::new(i as u64), Some(*v))),
            start,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_self_correlation_is_one() {
        let x = [3.0, 7.5, 1.2, 9.9, 4.4];
        assert!((pearson(&x, &x) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_symmetry() {
        let x = [1.0, 4.0, 2.0, 8.0, 5.0];
        let y = [2.0, 3.0, 9.0, 1.0, 7.0];
        assert!((pearson(&x, &y) - pearson(&y, &x)).abs() < EPS);
    }

    #[test]
    fn test_linear_relationships() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let up: Vec<f64> = x.iter().map(|v| 2.5 * v + 10.0).collect();
        let down: Vec<f64> = x.iter().map(|v| -0.3 * v + 4.0).collect();

        assert!((pearson(&x, &up) - 1.0).abs() < EPS);
        assert!((pearson(&x, &down) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_variance_yields_zero() {
        let constant = [5.0, 5.0, 5.0];
        let y = [1.0, 9.0, 2.0];
        assert_eq!(pearson(&constant, &y), 0.0);
        assert_eq!(pearson(&y, &constant), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn test_coefficient_stays_in_range() {
        let x = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        let y = [0.30000000000000004, 0.6, 0.9, 1.2, 1.5, 1.8, 2.1];
        let r = pearson(&x, &y);
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(Strength::from_coefficient(0.95), Strength::VeryStrong);
        assert_eq!(Strength::from_coefficient(-0.9), Strength::VeryStrong);
        assert_eq!(Strength::from_coefficient(0.7), Strength::Strong);
        assert_eq!(Strength::from_coefficient(-0.55), Strength::Moderate);
        assert_eq!(Strength::from_coefficient(0.3), Strength::Weak);
        assert_eq!(Strength::from_coefficient(0.29), Strength::VeryWeak);
        assert_eq!(Strength::from_coefficient(0.0), Strength::VeryWeak);
    }

    #[test]
    fn test_interpret_directions() {
        let positive = interpret(0.8);
        assert_eq!(positive.strength, "strong");
        assert_eq!(positive.direction, "positive");
        assert_eq!(positive.explanation, "as one increases, the other tends to increase");

        let negative = interpret(-0.4);
        assert_eq!(negative.strength, "weak");
        assert_eq!(negative.direction, "negative");
        assert_eq!(negative.explanation, "as one increases, the other tends to decrease");

        let none = interpret(0.0);
        assert_eq!(none.strength, "very weak or nonexistent");
        assert_eq!(none.direction, "");
        assert_eq!(none.explanation, "no apparent linear relationship");
    }

    #[test]
    fn test_perfectly_aligned_series() {
        let a = series("a", &[10.0, 20.0, 30.0]);
        let b = series("b", &[1.0, 2.0, 3.0]);

        let result = CorrelationResult::from_aligned(&align(&a, &b).unwrap());
        assert_eq!(result.coefficient, Some(1.0));
        assert_eq!(result.sample_count, 3);
        let interpretation = result.interpretation.unwrap();
        assert_eq!(interpretation.strength, "very strong");
        assert_eq!(interpretation.direction, "positive");
        assert_eq!(result.scatter_points.len(), 3);
    }

    #[test]
    fn test_constant_series_correlates_to_zero() {
        let a = series("a", &[5.0, 5.0, 5.0]);
        let b = series("b", &[1.0, 9.0, 2.0]);

        let result = CorrelationResult::from_aligned(&align(&a, &b).unwrap());
        assert_eq!(result.coefficient, Some(0.0));
        assert_eq!(result.interpretation.unwrap().direction, "");
    }

    #[test]
    fn test_coefficient_rounded_to_four_places() {
        let a = series("a", &[1.0, 2.0, 3.0, 4.0]);
        let b = series("b", &[1.0, 3.0, 2.0, 5.0]);

        let result = CorrelationResult::from_aligned(&align(&a, &b).unwrap());
        let r = result.coefficient.unwrap();
        assert_eq!(r, round_to(r, COEFFICIENT_PRECISION));
        assert!((r - 0.8315).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_result() {
        let result = CorrelationResult::insufficient(2);
        assert!(!result.is_computed());
        assert_eq!(result.sample_count, 2);
        assert!(result.message.unwrap().contains("minimum 3"));
    }
}
