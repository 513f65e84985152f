//! CSV export of a ranked analysis, implementing ReportPort.

use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::analytics::{AnalyzedBond, EvaluationContext};
use crate::domain::error::BondwatchError;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct ReportRow<'a> {
    rank: usize,
    id: u32,
    issue: &'a str,
    #[serde(rename = "type")]
    bond_type: &'static str,
    price: f64,
    coupon: f64,
    ytm: f64,
    tax_rate: f64,
    net_annual: f64,
    net_monthly: f64,
    roi: f64,
    yield_advantage: f64,
    days_to_maturity: u32,
    z_score: f64,
    band: &'static str,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

impl<'a> ReportRow<'a> {
    fn new(rank: usize, bond: &'a AnalyzedBond) -> Self {
        Self {
            rank,
            id: bond.id().0,
            issue: &bond.terms.issue_number,
            bond_type: bond.terms.bond_type.code(),
            price: bond.terms.price,
            coupon: bond.terms.coupon_rate_percent,
            ytm: round_to(bond.yield_to_maturity, 4),
            tax_rate: bond.tax_rate,
            net_annual: round_to(bond.net_annual_interest, 2),
            net_monthly: round_to(bond.net_monthly_income, 2),
            roi: round_to(bond.return_on_investment_percent, 4),
            yield_advantage: round_to(bond.yield_advantage_percent, 4),
            days_to_maturity: bond.days_to_maturity,
            z_score: round_to(bond.z_score, 4),
            band: bond.z_band().label(),
        }
    }
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Write the rows to any sink; `write` targets a file.
    pub fn write_to<W: io::Write>(bonds: &[AnalyzedBond], sink: W) -> Result<(), BondwatchError> {
        let mut wtr = csv::Writer::from_writer(sink);
        for (i, bond) in bonds.iter().enumerate() {
            wtr.serialize(ReportRow::new(i + 1, bond))
                .map_err(io::Error::from)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        bonds: &[AnalyzedBond],
        ctx: &EvaluationContext,
        output_path: &Path,
    ) -> Result<(), BondwatchError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_to(bonds, file)?;
        info!(
            path = %output_path.display(),
            rows = bonds.len(),
            as_of = %ctx.as_of_date,
            "wrote analysis report"
        );
        Ok(())
    }
}
