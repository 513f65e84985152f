//! Cross-sectional statistics over an analysed set.
//!
//! z = (x - mean) / stddev, with the population standard deviation.
//! A zero-variance set maps every z-score to 0.

use std::fmt;

use serde::Serialize;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = population_std_dev(values);
    values
        .iter()
        .map(|v| if sd == 0.0 { 0.0 } else { (v - m) / sd })
        .collect()
}

/// Display band for a z-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZScoreBand {
    Exceptional,
    AboveAverage,
    MarketAverage,
    BelowAverage,
    Poor,
}

impl ZScoreBand {
    pub fn classify(z: f64) -> Self {
        if z > 1.5 {
            ZScoreBand::Exceptional
        } else if z > 0.5 {
            ZScoreBand::AboveAverage
        } else if z > -0.5 {
            ZScoreBand::MarketAverage
        } else if z > -1.5 {
            ZScoreBand::BelowAverage
        } else {
            ZScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZScoreBand::Exceptional => "Exceptional Yield",
            ZScoreBand::AboveAverage => "Above Average",
            ZScoreBand::MarketAverage => "Market Average",
            ZScoreBand::BelowAverage => "Below Average",
            ZScoreBand::Poor => "Poor Yield",
        }
    }
}

impl fmt::Display for ZScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Position of a z-score marker on a 0-100% gauge, clamped to [5, 95].
pub fn gauge_position_percent(z: f64) -> f64 {
    (50.0 + z * 16.6).clamp(5.0, 95.0)
}
