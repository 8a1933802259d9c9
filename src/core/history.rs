//! Synthetic rate history
//!
//! The provider's historical endpoints are never consulted. A week of points is
//! fabricated around the single live quote with a deterministic alternating
//! perturbation, so the output is reproducible for a given rate and date. It is
//! not market data.

use chrono::{Days, NaiveDate};

/// Number of points in a series, today included.
pub const SERIES_LEN: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSeries {
    pub from: String,
    pub to: String,
    /// Oldest first, `today` last.
    pub points: Vec<RatePoint>,
}

/// Rate reported `offset` days before today: `rate + (-1)^offset * (offset / 100) * rate`.
pub fn perturbed_rate(rate: f64, offset: u64) -> f64 {
    if offset == 0 {
        return rate;
    }
    let sign = if offset % 2 == 0 { 1.0 } else { -1.0 };
    rate + sign * (offset as f64 / 100.0) * rate
}

impl SyntheticSeries {
    pub fn generate(from: &str, to: &str, rate: f64, today: NaiveDate) -> Self {
        let points = (0..SERIES_LEN)
            .rev()
            .filter_map(|offset| {
                let date = today.checked_sub_days(Days::new(offset))?;
                Some(RatePoint {
                    date,
                    rate: perturbed_rate(rate, offset),
                })
            })
            .collect();

        SyntheticSeries {
            from: from.to_string(),
            to: to.to_string(),
            points,
        }
    }

    /// ISO-8601 day strings, oldest first.
    pub fn dates(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rate).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
