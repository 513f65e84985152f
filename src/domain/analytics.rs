//! Bond analytics engine.
//!
//! Pure functions turning a bond term sheet, an investment amount and an
//! evaluation date into investor-facing metrics. Nothing here reads ambient
//! state: the caller supplies every date explicitly.
//!
//! YTM uses the closed-form approximation
//! `(C + (100 - P) / n) / ((100 + P) / 2)`; coupon frequency is not modelled.
//! Ranking and z-scores are defined relative to this approximation.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::bond::{BondId, BondTerms, BondType, PAR};
use crate::domain::error::BondwatchError;
use crate::domain::ranking::{rank_by, RankMetric};
use crate::domain::statistics::{z_scores, ZScoreBand};

pub const SHORT_TERM_TAX_RATE: f64 = 0.15;
pub const LONG_TERM_TAX_RATE: f64 = 0.10;
pub const INFRASTRUCTURE_TAX_RATE: f64 = 0.0;
/// Tenor at which withholding tax drops to the long-term rate.
pub const LONG_TERM_TENOR_YEARS: u32 = 10;

/// Fixed deposit rate used as the comparison benchmark.
pub const BANK_RATE: f64 = 0.07;
/// Withholding tax on bank deposit interest.
pub const BANK_TAX: f64 = 0.15;

/// Floor on remaining years so the YTM approximation stays bounded near maturity.
pub const MIN_YEARS_TO_MATURITY: f64 = 0.1;
const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Withholding tax rate applied to coupon income.
pub fn tax_rate(bond: &BondTerms) -> f64 {
    if bond.bond_type == BondType::InfrastructureBond {
        INFRASTRUCTURE_TAX_RATE
    } else if bond.tenor_years >= LONG_TERM_TENOR_YEARS {
        LONG_TERM_TAX_RATE
    } else {
        SHORT_TERM_TAX_RATE
    }
}

/// Remaining life in years from `reference_date`, floored at
/// [`MIN_YEARS_TO_MATURITY`].
pub fn years_to_maturity(maturity_date: NaiveDate, reference_date: NaiveDate) -> f64 {
    let days = (maturity_date - reference_date).num_days() as f64;
    (days / DAYS_PER_YEAR).max(MIN_YEARS_TO_MATURITY)
}

/// Approximate yield to maturity, in percent.
pub fn yield_to_maturity(bond: &BondTerms, reference_date: NaiveDate) -> f64 {
    let years = years_to_maturity(bond.maturity_date, reference_date);
    let annual_gain = bond.coupon_rate_percent + (PAR - bond.price) / years;
    let average_price = (PAR + bond.price) / 2.0;
    annual_gain / average_price * 100.0
}

/// Whole days until maturity; zero once the bond has matured.
pub fn days_to_maturity(maturity_date: NaiveDate, as_of_date: NaiveDate) -> u32 {
    let days = (maturity_date - as_of_date).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Annual income on an investment, after tax, with the bank deposit benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnBreakdown {
    pub tax_rate: f64,
    pub face_value_bought: f64,
    pub gross_annual_interest: f64,
    pub tax_paid: f64,
    pub net_annual_interest: f64,
    pub net_monthly_income: f64,
    pub bank_benchmark_gross_annual: f64,
    pub bank_benchmark_net_annual: f64,
    pub yield_advantage_percent: f64,
    pub return_on_investment_percent: f64,
}

pub fn calculate_returns(
    bond: &BondTerms,
    investment_amount: f64,
) -> Result<ReturnBreakdown, BondwatchError> {
    if !investment_amount.is_finite() || investment_amount <= 0.0 {
        return Err(BondwatchError::invalid_input(format!(
            "investment amount must be positive, got {investment_amount}"
        )));
    }
    if !bond.price.is_finite() || bond.price <= 0.0 {
        return Err(BondwatchError::invalid_input(format!(
            "bond {}: price must be positive, got {}",
            bond.id, bond.price
        )));
    }

    let tax_rate = tax_rate(bond);
    let face_value_bought = investment_amount / (bond.price / PAR);
    let gross_annual_interest = face_value_bought * bond.coupon_rate_percent / 100.0;
    let tax_paid = gross_annual_interest * tax_rate;
    let net_annual_interest = gross_annual_interest * (1.0 - tax_rate);

    let bank_benchmark_gross_annual = investment_amount * BANK_RATE;
    let bank_benchmark_net_annual = bank_benchmark_gross_annual * (1.0 - BANK_TAX);
    let yield_advantage_percent = if bank_benchmark_net_annual != 0.0 {
        (net_annual_interest - bank_benchmark_net_annual) / bank_benchmark_net_annual * 100.0
    } else {
        0.0
    };

    Ok(ReturnBreakdown {
        tax_rate,
        face_value_bought,
        gross_annual_interest,
        tax_paid,
        net_annual_interest,
        net_monthly_income: net_annual_interest / MONTHS_PER_YEAR,
        bank_benchmark_gross_annual,
        bank_benchmark_net_annual,
        yield_advantage_percent,
        return_on_investment_percent: net_annual_interest / investment_amount * 100.0,
    })
}

/// Inputs shared by every bond in one analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationContext {
    pub as_of_date: NaiveDate,
    pub investment_amount: f64,
    /// Anchor date for the YTM approximation.
    pub yield_reference_date: NaiveDate,
}

impl EvaluationContext {
    pub fn new(as_of_date: NaiveDate, investment_amount: f64) -> Result<Self, BondwatchError> {
        let ctx = Self {
            as_of_date,
            investment_amount,
            yield_reference_date: as_of_date,
        };
        ctx.validate()?;
        Ok(ctx)
    }

    pub fn with_yield_reference(mut self, date: NaiveDate) -> Self {
        self.yield_reference_date = date;
        self
    }

    pub fn validate(&self) -> Result<(), BondwatchError> {
        if !self.investment_amount.is_finite() || self.investment_amount <= 0.0 {
            return Err(BondwatchError::invalid_input(format!(
                "investment amount must be positive, got {}",
                self.investment_amount
            )));
        }
        Ok(())
    }
}

/// A bond with all metrics for one [`EvaluationContext`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedBond {
    pub terms: BondTerms,
    pub yield_to_maturity: f64,
    pub tax_rate: f64,
    pub face_value_bought: f64,
    pub gross_annual_interest: f64,
    pub net_annual_interest: f64,
    pub tax_paid: f64,
    pub net_monthly_income: f64,
    pub bank_benchmark_net_annual: f64,
    pub yield_advantage_percent: f64,
    pub return_on_investment_percent: f64,
    pub days_to_maturity: u32,
    pub z_score: f64,
}

impl AnalyzedBond {
    pub fn id(&self) -> BondId {
        self.terms.id
    }

    pub fn z_band(&self) -> ZScoreBand {
        ZScoreBand::classify(self.z_score)
    }

    fn build(
        terms: &BondTerms,
        ctx: &EvaluationContext,
        z_score: f64,
    ) -> Result<Self, BondwatchError> {
        let returns = calculate_returns(terms, ctx.investment_amount)?;
        let analyzed = Self {
            terms: terms.clone(),
            yield_to_maturity: yield_to_maturity(terms, ctx.yield_reference_date),
            tax_rate: returns.tax_rate,
            face_value_bought: returns.face_value_bought,
            gross_annual_interest: returns.gross_annual_interest,
            net_annual_interest: returns.net_annual_interest,
            tax_paid: returns.tax_paid,
            net_monthly_income: returns.net_monthly_income,
            bank_benchmark_net_annual: returns.bank_benchmark_net_annual,
            yield_advantage_percent: returns.yield_advantage_percent,
            return_on_investment_percent: returns.return_on_investment_percent,
            days_to_maturity: days_to_maturity(terms.maturity_date, ctx.as_of_date),
            z_score,
        };
        analyzed.ensure_finite()?;
        Ok(analyzed)
    }

    /// Extreme amounts or prices can overflow even when every input is finite.
    fn ensure_finite(&self) -> Result<(), BondwatchError> {
        let metrics = [
            ("yield_to_maturity", self.yield_to_maturity),
            ("face_value_bought", self.face_value_bought),
            ("gross_annual_interest", self.gross_annual_interest),
            ("net_annual_interest", self.net_annual_interest),
            ("tax_paid", self.tax_paid),
            ("net_monthly_income", self.net_monthly_income),
            ("bank_benchmark_net_annual", self.bank_benchmark_net_annual),
            ("yield_advantage_percent", self.yield_advantage_percent),
            ("return_on_investment_percent", self.return_on_investment_percent),
            ("z_score", self.z_score),
        ];
        match metrics.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(BondwatchError::invalid_input(format!(
                "bond {}: {name} is not finite ({value})",
                self.terms.id
            ))),
            None => Ok(()),
        }
    }
}

/// Analyse a whole catalog: per-bond metrics, the cross-sectional YTM
/// z-score, then a stable descending sort by return on investment.
///
/// Every bond is validated before anything is computed, so the result is
/// either complete or an error.
pub fn analyze(
    catalog: &[BondTerms],
    ctx: &EvaluationContext,
) -> Result<Vec<AnalyzedBond>, BondwatchError> {
    analyze_by(catalog, ctx, RankMetric::ReturnOnInvestment)
}

/// As [`analyze`], ranked by `metric`. Ties keep catalog order.
pub fn analyze_by(
    catalog: &[BondTerms],
    ctx: &EvaluationContext,
    metric: RankMetric,
) -> Result<Vec<AnalyzedBond>, BondwatchError> {
    ctx.validate()?;
    for bond in catalog {
        bond.validate()?;
    }

    let ytms: Vec<f64> = catalog
        .iter()
        .map(|b| yield_to_maturity(b, ctx.yield_reference_date))
        .collect();
    let scores = z_scores(&ytms);

    let mut analyzed = catalog
        .iter()
        .zip(scores)
        .map(|(bond, z)| AnalyzedBond::build(bond, ctx, z))
        .collect::<Result<Vec<_>, _>>()?;

    rank_by(&mut analyzed, metric);

    debug!(
        bonds = analyzed.len(),
        %metric,
        as_of = %ctx.as_of_date,
        amount = ctx.investment_amount,
        "analysis complete"
    );
    Ok(analyzed)
}
