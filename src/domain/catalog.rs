//! Bond catalog: the seed universe plus user-added entries.
//!
//! Ids come from a monotonic allocator, so an id is never handed out twice
//! even after bonds are removed.

use chrono::{Months, NaiveDate};
use tracing::info;

use crate::domain::bond::{BondId, BondTerms, BondType};
use crate::domain::error::BondwatchError;

pub const CUSTOM_DESCRIPTION: &str = "Custom Entry";

/// Hands out strictly increasing bond ids.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn starting_after(last: u32) -> Self {
        Self {
            next: last.saturating_add(1),
        }
    }

    pub fn allocate(&mut self) -> BondId {
        let id = BondId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn peek(&self) -> BondId {
        BondId(self.next)
    }
}

/// Term sheet of a bond the user wants to add; the id is assigned by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBond {
    pub issue_number: String,
    pub isin: Option<String>,
    pub bond_type: BondType,
    pub tenor_years: u32,
    pub coupon_rate_percent: f64,
    pub price: f64,
    pub issue_date: NaiveDate,
    /// Defaults to `issue_date + tenor_years`.
    pub maturity_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl NewBond {
    fn into_terms(self, id: BondId) -> Result<BondTerms, BondwatchError> {
        if self.issue_number.trim().is_empty() {
            return Err(BondwatchError::invalid_input("issue number must not be empty"));
        }
        let maturity_date = match self.maturity_date {
            Some(d) => d,
            None => self
                .issue_date
                .checked_add_months(Months::new(self.tenor_years.saturating_mul(12)))
                .ok_or_else(|| {
                    BondwatchError::invalid_input(format!(
                        "cannot derive maturity for tenor of {} years",
                        self.tenor_years
                    ))
                })?,
        };
        let terms = BondTerms {
            id,
            issue_number: self.issue_number.trim().to_string(),
            isin: self.isin.unwrap_or_default(),
            issue_date: self.issue_date,
            maturity_date,
            bond_type: self.bond_type,
            tenor_years: self.tenor_years,
            coupon_rate_percent: self.coupon_rate_percent,
            price: self.price,
            description: self
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| CUSTOM_DESCRIPTION.to_string()),
        };
        terms.validate()?;
        Ok(terms)
    }
}

#[derive(Debug, Clone)]
pub struct BondCatalog {
    bonds: Vec<BondTerms>,
    ids: IdAllocator,
}

impl BondCatalog {
    pub fn new(bonds: Vec<BondTerms>) -> Self {
        let last = bonds.iter().map(|b| b.id.0).max().unwrap_or(0);
        Self {
            bonds,
            ids: IdAllocator::starting_after(last),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_bonds())
    }

    pub fn bonds(&self) -> &[BondTerms] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn get(&self, id: BondId) -> Option<&BondTerms> {
        self.bonds.iter().find(|b| b.id == id)
    }

    /// Validate and append a bond; returns its new id.
    pub fn add_custom(&mut self, bond: NewBond) -> Result<BondId, BondwatchError> {
        let terms = bond.into_terms(self.ids.peek())?;
        let id = self.ids.allocate();
        info!(id = %id, issue = %terms.issue_number, "added custom bond");
        self.bonds.push(terms);
        Ok(id)
    }

    pub fn remove(&mut self, id: BondId) -> Option<BondTerms> {
        let pos = self.bonds.iter().position(|b| b.id == id)?;
        Some(self.bonds.remove(pos))
    }

    /// Swap in a re-priced set; records keep their ids.
    pub fn replace_prices(&mut self, repriced: Vec<BondTerms>) {
        self.bonds = repriced;
    }
}

impl Default for BondCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: u32,
    issue_number: &str,
    isin: &str,
    issue: (i32, u32, u32),
    maturity: (i32, u32, u32),
    bond_type: BondType,
    tenor_years: u32,
    coupon_rate_percent: f64,
    price: f64,
    description: &str,
) -> BondTerms {
    BondTerms {
        id: BondId(id),
        issue_number: issue_number.to_string(),
        isin: isin.to_string(),
        issue_date: ymd(issue),
        maturity_date: ymd(maturity),
        bond_type,
        tenor_years,
        coupon_rate_percent,
        price,
        description: description.to_string(),
    }
}

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Seven reference instruments listed on the NSE.
#[rustfmt::skip]
pub fn seed_bonds() -> Vec<BondTerms> {
    use BondType::{FixedRate as Fxd, InfrastructureBond as Ifb};
    vec![
        seed(1, "FXD1/2023/03", "KE5000009653", (2023, 4, 10), (2026, 4, 6), Fxd, 3, 16.537, 101.76, "3-Year Fixed Bond"),
        seed(2, "FXD1/2018/10", "KE5000002145", (2018, 8, 20), (2028, 8, 14), Fxd, 10, 12.50, 103.38, "10-Year Re-opened Bond"),
        seed(3, "IFB1/2014/12", "KE4000001852", (2014, 10, 27), (2026, 10, 12), Ifb, 12, 11.00, 101.77, "Infrastructure Bond (Tax Free)"),
        seed(4, "FXD1/2021/25", "KE6000007890", (2021, 5, 15), (2046, 5, 8), Fxd, 25, 13.44, 107.82, "25-Year Long Term"),
        seed(5, "IFB1/2023/17", "KE5000009988", (2023, 2, 20), (2040, 2, 14), Ifb, 17, 14.399, 102.12, "Infrastructure Bond"),
        seed(6, "FXD1/2024/03", "KE5000010123", (2024, 3, 15), (2027, 3, 12), Fxd, 3, 18.385, 103.02, "New Short Term High Yielder"),
        seed(7, "FXD1/2023/05", "KE5000009874", (2023, 7, 10), (2028, 7, 3), Fxd, 5, 16.844, 114.72, "5-Year Benchmark Bond"),
    ]
}
