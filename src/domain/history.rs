//! Synthetic historical yield series for the bond detail chart.
//!
//! The series is centred on today's approximate YTM with a slow sine trend
//! and uniform noise; longer-tenor bonds get twice the volatility.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate};
use serde::Serialize;

use crate::domain::analytics::yield_to_maturity;
use crate::domain::bond::BondTerms;
use crate::domain::error::BondwatchError;
use crate::domain::market_feed::round2;
use crate::ports::random_port::JitterSource;

const HIGH_VOLATILITY: f64 = 0.8;
const LOW_VOLATILITY: f64 = 0.4;
const HIGH_VOLATILITY_TENOR: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartRange {
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
}

impl ChartRange {
    /// Number of steps back from the end date; the series has one more point.
    pub fn steps(&self) -> u32 {
        match self {
            ChartRange::ThreeMonths => 12,
            ChartRange::SixMonths => 24,
            ChartRange::OneYear => 12,
        }
    }

    fn date_at(&self, end: NaiveDate, step: u32) -> NaiveDate {
        match self {
            ChartRange::OneYear => end.checked_sub_months(Months::new(step)).unwrap_or(end),
            ChartRange::ThreeMonths | ChartRange::SixMonths => {
                end - Duration::weeks(i64::from(step))
            }
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ChartRange::ThreeMonths => "3M",
            ChartRange::SixMonths => "6M",
            ChartRange::OneYear => "1Y",
        })
    }
}

impl FromStr for ChartRange {
    type Err = BondwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "3M" => Ok(ChartRange::ThreeMonths),
            "6M" => Ok(ChartRange::SixMonths),
            "1Y" | "12M" => Ok(ChartRange::OneYear),
            other => Err(BondwatchError::invalid_input(format!(
                "unknown chart range '{other}' (expected 3M, 6M or 1Y)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldPoint {
    pub date: NaiveDate,
    pub yield_percent: f64,
}

impl YieldPoint {
    /// Axis label, e.g. `7 Jan`.
    pub fn label(&self) -> String {
        self.date.format("%-d %b").to_string()
    }
}

/// Yield points in chronological order, ending at `end_date`.
pub fn historical_yields(
    bond: &BondTerms,
    yield_reference_date: NaiveDate,
    end_date: NaiveDate,
    range: ChartRange,
    jitter: &mut dyn JitterSource,
) -> Vec<YieldPoint> {
    let current = yield_to_maturity(bond, yield_reference_date);
    let volatility = if bond.tenor_years > HIGH_VOLATILITY_TENOR {
        HIGH_VOLATILITY
    } else {
        LOW_VOLATILITY
    };

    (0..=range.steps())
        .rev()
        .map(|step| {
            let noise = jitter.uniform(-volatility / 2.0, volatility / 2.0);
            let trend = (f64::from(step) * 0.5).sin() * (volatility / 2.0);
            YieldPoint {
                date: range.date_at(end_date, step),
                yield_percent: round2(current + noise + trend),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::seed_bonds;
    use approx::assert_relative_eq;

    struct Zero;

    impl JitterSource for Zero {
        fn uniform(&mut self, _low: f64, _high: f64) -> f64 {
            0.0
        }
    }

    struct Bounds(Vec<(f64, f64)>);

    impl JitterSource for Bounds {
        fn uniform(&mut self, low: f64, high: f64) -> f64 {
            self.0.push((low, high));
            low
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn point_counts_per_range() {
        let bond = &seed_bonds()[0];
        let end = date(2026, 1, 7);
        for (range, n) in [
            (ChartRange::ThreeMonths, 13),
            (ChartRange::SixMonths, 25),
            (ChartRange::OneYear, 13),
        ] {
            assert_eq!(historical_yields(bond, end, end, range, &mut Zero).len(), n);
        }
    }

    #[test]
    fn weekly_dates_end_at_end_date() {
        let bond = &seed_bonds()[0];
        let end = date(2026, 1, 7);
        let series = historical_yields(bond, end, end, ChartRange::ThreeMonths, &mut Zero);
        assert_eq!(series.first().unwrap().date, date(2025, 10, 15));
        assert_eq!(series.last().unwrap().date, end);
        assert!(series.windows(2).all(|w| (w[1].date - w[0].date).num_days() == 7));
    }

    #[test]
    fn monthly_dates_for_one_year() {
        let bond = &seed_bonds()[0];
        let end = date(2026, 1, 31);
        let series = historical_yields(bond, end, end, ChartRange::OneYear, &mut Zero);
        assert_eq!(series[0].date, date(2025, 1, 31));
        assert_eq!(series[1].date, date(2025, 2, 28));
        assert_eq!(series[12].date, end);
    }

    #[test]
    fn last_point_is_current_yield_without_noise() {
        let bond = &seed_bonds()[1];
        let end = date(2026, 1, 5);
        let series = historical_yields(bond, end, end, ChartRange::SixMonths, &mut Zero);
        let expected = round2(yield_to_maturity(bond, end));
        assert_relative_eq!(series.last().unwrap().yield_percent, expected);
    }

    #[test]
    fn long_tenor_bonds_get_wider_noise() {
        let bonds = seed_bonds();
        let end = date(2026, 1, 5);

        let mut long = Bounds(Vec::new());
        historical_yields(&bonds[3], end, end, ChartRange::ThreeMonths, &mut long);
        assert!(long.0.iter().all(|&(lo, hi)| lo == -0.4 && hi == 0.4));

        // exactly ten years is not above the threshold
        let mut ten = Bounds(Vec::new());
        historical_yields(&bonds[1], end, end, ChartRange::ThreeMonths, &mut ten);
        assert!(ten.0.iter().all(|&(lo, hi)| lo == -0.2 && hi == 0.2));
    }

    #[test]
    fn range_parsing_and_labels() {
        assert_eq!("3m".parse::<ChartRange>().unwrap(), ChartRange::ThreeMonths);
        assert_eq!("1Y".parse::<ChartRange>().unwrap(), ChartRange::OneYear);
        assert!("5Y".parse::<ChartRange>().is_err());
        assert_eq!(ChartRange::default().to_string(), "6M");
        let p = YieldPoint {
            date: date(2026, 1, 7),
            yield_percent: 12.0,
        };
        assert_eq!(p.label(), "7 Jan");
    }
}
