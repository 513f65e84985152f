//! Ordering and lookup over an analysed set.

use std::fmt;
use std::str::FromStr;

use crate::domain::analytics::AnalyzedBond;
use crate::domain::bond::BondId;
use crate::domain::error::BondwatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMetric {
    #[default]
    ReturnOnInvestment,
    YieldToMaturity,
    ZScore,
    NetMonthlyIncome,
    DaysToMaturity,
}

impl RankMetric {
    pub fn key(&self, bond: &AnalyzedBond) -> f64 {
        match self {
            RankMetric::ReturnOnInvestment => bond.return_on_investment_percent,
            RankMetric::YieldToMaturity => bond.yield_to_maturity,
            RankMetric::ZScore => bond.z_score,
            RankMetric::NetMonthlyIncome => bond.net_monthly_income,
            RankMetric::DaysToMaturity => f64::from(bond.days_to_maturity),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RankMetric::ReturnOnInvestment => "roi",
            RankMetric::YieldToMaturity => "ytm",
            RankMetric::ZScore => "zscore",
            RankMetric::NetMonthlyIncome => "monthly",
            RankMetric::DaysToMaturity => "days",
        }
    }
}

impl fmt::Display for RankMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for RankMetric {
    type Err = BondwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "roi" | "return" => Ok(RankMetric::ReturnOnInvestment),
            "ytm" | "yield" => Ok(RankMetric::YieldToMaturity),
            "zscore" | "z" => Ok(RankMetric::ZScore),
            "monthly" | "income" => Ok(RankMetric::NetMonthlyIncome),
            "days" | "maturity" => Ok(RankMetric::DaysToMaturity),
            other => Err(BondwatchError::invalid_input(format!(
                "unknown sort metric '{other}' (expected roi, ytm, zscore, monthly or days)"
            ))),
        }
    }
}

/// Stable descending sort; ties keep their incoming order.
pub fn rank_by(bonds: &mut [AnalyzedBond], metric: RankMetric) {
    bonds.sort_by(|a, b| metric.key(b).total_cmp(&metric.key(a)));
}

pub fn find_by_id(bonds: &[AnalyzedBond], id: BondId) -> Option<&AnalyzedBond> {
    bonds.iter().find(|b| b.id() == id)
}

pub fn top(bonds: &[AnalyzedBond]) -> Option<&AnalyzedBond> {
    bonds.first()
}

/// The bond a detail view should show: the requested one if present,
/// otherwise the top-ranked bond.
pub fn selected_or_top(bonds: &[AnalyzedBond], id: Option<BondId>) -> Option<&AnalyzedBond> {
    id.and_then(|id| find_by_id(bonds, id)).or_else(|| top(bonds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bond::{BondTerms, BondType};
    use chrono::NaiveDate;

    fn analyzed(id: u32, roi: f64, ytm: f64, days: u32) -> AnalyzedBond {
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        AnalyzedBond {
            terms: BondTerms {
                id: BondId(id),
                issue_number: format!("B{id}"),
                isin: String::new(),
                issue_date: d,
                maturity_date: d + chrono::Duration::days(i64::from(days) + 1),
                bond_type: BondType::FixedRate,
                tenor_years: 3,
                coupon_rate_percent: 10.0,
                price: 100.0,
                description: String::new(),
            },
            yield_to_maturity: ytm,
            tax_rate: 0.15,
            face_value_bought: 0.0,
            gross_annual_interest: 0.0,
            net_annual_interest: 0.0,
            tax_paid: 0.0,
            net_monthly_income: roi,
            bank_benchmark_net_annual: 0.0,
            yield_advantage_percent: 0.0,
            return_on_investment_percent: roi,
            days_to_maturity: days,
            z_score: ytm - 10.0,
        }
    }

    #[test]
    fn rank_by_roi_is_stable() {
        let mut bonds = vec![
            analyzed(1, 8.0, 10.0, 100),
            analyzed(2, 12.0, 9.0, 50),
            analyzed(3, 8.0, 11.0, 70),
            analyzed(4, 12.0, 8.0, 10),
        ];
        rank_by(&mut bonds, RankMetric::ReturnOnInvestment);
        let ids: Vec<u32> = bonds.iter().map(|b| b.id().0).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn rank_by_other_metrics() {
        let mut bonds = vec![
            analyzed(1, 8.0, 10.0, 100),
            analyzed(2, 12.0, 9.0, 50),
            analyzed(3, 9.0, 11.0, 700),
        ];
        rank_by(&mut bonds, RankMetric::YieldToMaturity);
        assert_eq!(bonds[0].id(), BondId(3));
        rank_by(&mut bonds, RankMetric::DaysToMaturity);
        assert_eq!(bonds[2].id(), BondId(2));
        rank_by(&mut bonds, RankMetric::ZScore);
        assert_eq!(bonds[0].id(), BondId(3));
    }

    #[test]
    fn lookup_by_id() {
        let bonds = vec![analyzed(5, 8.0, 10.0, 100), analyzed(9, 7.0, 9.0, 50)];
        assert_eq!(find_by_id(&bonds, BondId(9)).unwrap().id(), BondId(9));
        assert!(find_by_id(&bonds, BondId(1)).is_none());
        assert_eq!(selected_or_top(&bonds, Some(BondId(1))).unwrap().id(), BondId(5));
        assert_eq!(selected_or_top(&bonds, None).unwrap().id(), BondId(5));
        assert!(selected_or_top(&[], None).is_none());
    }

    #[test]
    fn metric_parsing() {
        assert_eq!("ROI".parse::<RankMetric>().unwrap(), RankMetric::ReturnOnInvestment);
        assert_eq!("ytm".parse::<RankMetric>().unwrap(), RankMetric::YieldToMaturity);
        assert_eq!("zscore".parse::<RankMetric>().unwrap(), RankMetric::ZScore);
        assert!("alpha".parse::<RankMetric>().is_err());
        assert_eq!(RankMetric::default().to_string(), "roi");
    }
}
