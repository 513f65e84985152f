//! Plain-text tables for the terminal.
//!
//! Renders the catalog, the ranked analysis and a single-bond detail view
//! (returns breakdown, z-score gauge, yield history).

use chrono::NaiveDate;

use crate::domain::analytics::{AnalyzedBond, EvaluationContext};
use crate::domain::bond::BondTerms;
use crate::domain::history::{ChartRange, YieldPoint};
use crate::domain::ranking::RankMetric;
use crate::domain::statistics::gauge_position_percent;

const GAUGE_WIDTH: usize = 41;

/// `KES 1,234,567`, rounded to whole shillings.
pub fn format_kes(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}KES {grouped}")
}

/// `06 Apr 2026`.
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn render_catalog(bonds: &[BondTerms]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>3}  {:<14} {:<13} {:<4} {:>5} {:>8} {:>8}  {:<12}  {}\n",
        "ID", "Issue", "ISIN", "Type", "Tenor", "Coupon", "Price", "Maturity", "Description"
    ));
    for b in bonds {
        out.push_str(&format!(
            "{:>3}  {:<14} {:<13} {:<4} {:>4}y {:>7.3}% {:>8.2}  {:<12}  {}\n",
            b.id,
            b.issue_number,
            b.isin,
            b.bond_type,
            b.tenor_years,
            b.coupon_rate_percent,
            b.price,
            format_date_short(b.maturity_date),
            b.description
        ));
    }
    out
}

pub fn render_analysis(
    bonds: &[AnalyzedBond],
    ctx: &EvaluationContext,
    metric: RankMetric,
) -> String {
    let mut out = format!(
        "Analysis as of {} for {} (sorted by {})\n\n",
        format_date_short(ctx.as_of_date),
        format_kes(ctx.investment_amount),
        metric
    );
    out.push_str(&format!(
        "{:>2} {:>3}  {:<14} {:<4} {:>8} {:>7} {:>5} {:>16} {:>14} {:>7} {:>8} {:>6} {:>6}  {}\n",
        "#", "ID", "Issue", "Type", "Price", "YTM%", "Tax", "Net annual", "Net monthly", "ROI%",
        "vs bank", "Days", "Z", "Band"
    ));
    for (rank, b) in bonds.iter().enumerate() {
        out.push_str(&format!(
            "{:>2} {:>3}  {:<14} {:<4} {:>8.2} {:>7.2} {:>4.0}% {:>16} {:>14} {:>7.2} {:>+7.1}% {:>6} {:>6.2}  {}\n",
            rank + 1,
            b.id(),
            b.terms.issue_number,
            b.terms.bond_type,
            b.terms.price,
            b.yield_to_maturity,
            b.tax_rate * 100.0,
            format_kes(b.net_annual_interest),
            format_kes(b.net_monthly_income),
            b.return_on_investment_percent,
            b.yield_advantage_percent,
            b.days_to_maturity,
            b.z_score,
            b.z_band()
        ));
    }
    out
}

/// Text gauge with the z-score marker, e.g. `[----------|----*-----]`.
pub fn render_gauge(z: f64) -> String {
    let pos = gauge_position_percent(z) / 100.0 * (GAUGE_WIDTH - 1) as f64;
    let marker = pos.round() as usize;
    let centre = GAUGE_WIDTH / 2;
    let cells: String = (0..GAUGE_WIDTH)
        .map(|i| {
            if i == marker {
                '*'
            } else if i == centre {
                '|'
            } else {
                '-'
            }
        })
        .collect();
    format!("[{cells}]")
}

pub fn render_detail(bond: &AnalyzedBond, range: ChartRange, history: &[YieldPoint]) -> String {
    let t = &bond.terms;
    let mut out = String::new();
    out.push_str(&format!("{} ({}) - {}\n", t.issue_number, t.bond_type, t.description));
    out.push_str(&format!(
        "ISIN {}  issued {}  matures {} ({} days)\n\n",
        if t.isin.is_empty() { "-" } else { &t.isin },
        format_date_short(t.issue_date),
        format_date_short(t.maturity_date),
        bond.days_to_maturity
    ));
    out.push_str(&format!(
        "Price            {:.2} ({})\n",
        t.price,
        if t.is_discount() {
            "discount"
        } else if t.is_premium() {
            "premium"
        } else {
            "par"
        }
    ));
    out.push_str(&format!("Coupon           {:.3}%\n", t.coupon_rate_percent));
    out.push_str(&format!("Yield (YTM)      {:.2}%\n", bond.yield_to_maturity));
    out.push_str(&format!("Withholding tax  {:.0}%\n\n", bond.tax_rate * 100.0));

    out.push_str(&format!("Face value bought    {}\n", format_kes(bond.face_value_bought)));
    out.push_str(&format!("Gross annual         {}\n", format_kes(bond.gross_annual_interest)));
    out.push_str(&format!("Tax paid             {}\n", format_kes(bond.tax_paid)));
    out.push_str(&format!("Net annual           {}\n", format_kes(bond.net_annual_interest)));
    out.push_str(&format!("Net monthly          {}\n", format_kes(bond.net_monthly_income)));
    out.push_str(&format!(
        "Bank deposit (net)   {}  ({:+.1}% advantage)\n",
        format_kes(bond.bank_benchmark_net_annual),
        bond.yield_advantage_percent
    ));
    out.push_str(&format!(
        "Return on investment {:.2}%\n\n",
        bond.return_on_investment_percent
    ));

    out.push_str(&format!(
        "Market z-score {:+.2}: {}\n{}\n\n",
        bond.z_score,
        bond.z_band(),
        render_gauge(bond.z_score)
    ));

    out.push_str(&format!("Yield history ({range})\n"));
    for p in history {
        out.push_str(&format!("  {:>7}  {:>6.2}%\n", p.label(), p.yield_percent));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::analyze;
    use crate::domain::catalog::seed_bonds;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn kes_grouping() {
        assert_eq!(format_kes(0.0), "KES 0");
        assert_eq!(format_kes(999.4), "KES 999");
        assert_eq!(format_kes(1000.0), "KES 1,000");
        assert_eq!(format_kes(1_000_000.0), "KES 1,000,000");
        assert_eq!(format_kes(11_511.11), "KES 11,511");
        assert_eq!(format_kes(-59_500.0), "-KES 59,500");
    }

    #[test]
    fn short_date() {
        assert_eq!(format_date_short(date(2026, 4, 6)), "06 Apr 2026");
    }

    #[test]
    fn gauge_marker_position() {
        let centre = render_gauge(0.0);
        assert_eq!(centre.len(), GAUGE_WIDTH + 2);
        assert_eq!(centre.chars().nth(GAUGE_WIDTH / 2 + 1), Some('*'));
        assert!(render_gauge(10.0).ends_with("*--]"));
        assert!(render_gauge(-10.0).starts_with("[--*"));
    }

    #[test]
    fn analysis_table_lists_every_bond() {
        let ctx = EvaluationContext::new(date(2026, 1, 5), 1_000_000.0).unwrap();
        let bonds = analyze(&seed_bonds(), &ctx).unwrap();
        let table = render_analysis(&bonds, &ctx, RankMetric::ReturnOnInvestment);
        assert!(table.contains("KES 1,000,000"));
        assert!(table.contains("sorted by roi"));
        for b in &bonds {
            assert!(table.contains(&b.terms.issue_number));
        }
    }

    #[test]
    fn detail_view_contents() {
        let ctx = EvaluationContext::new(date(2026, 1, 5), 1_000_000.0).unwrap();
        let bonds = analyze(&seed_bonds(), &ctx).unwrap();
        let bond = bonds.iter().find(|b| b.id().0 == 1).unwrap();
        let history = vec![YieldPoint {
            date: date(2026, 1, 5),
            yield_percent: 9.39,
        }];
        let text = render_detail(bond, ChartRange::ThreeMonths, &history);
        assert!(text.contains("FXD1/2023/03 (FXD)"));
        assert!(text.contains("(premium)"));
        assert!(text.contains("Net monthly          KES 11,511"));
        assert!(text.contains("Yield history (3M)"));
        assert!(text.contains("5 Jan"));
    }

    #[test]
    fn catalog_table() {
        let text = render_catalog(&seed_bonds());
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains("KE4000001852"));
    }
}
