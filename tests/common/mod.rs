#![allow(dead_code)]

use bondwatch::domain::bond::{BondId, BondTerms, BondType};
use bondwatch::domain::catalog::NewBond;
use bondwatch::domain::error::BondwatchError;
use bondwatch::ports::bond_source_port::BondSourcePort;
use bondwatch::ports::explain_port::ExplainPort;
use bondwatch::ports::random_port::JitterSource;
use chrono::NaiveDate;
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct MockBondSource {
    pub bonds: Vec<NewBond>,
    pub error: Option<String>,
}

impl MockBondSource {
    pub fn new(bonds: Vec<NewBond>) -> Self {
        Self { bonds, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bonds: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl BondSourcePort for MockBondSource {
    fn load_bonds(&self) -> Result<Vec<NewBond>, BondwatchError> {
        match &self.error {
            Some(reason) => Err(BondwatchError::BondData {
                reason: reason.clone(),
            }),
            None => Ok(self.bonds.clone()),
        }
    }
}

/// Always returns the same draw, clamped into the requested range.
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.0.clamp(low, high)
    }
}

/// Records prompts and replies with a canned result.
pub struct MockExplainPort {
    pub reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockExplainPort {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl ExplainPort for MockExplainPort {
    fn generate(&self, prompt: &str) -> Result<String, BondwatchError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .map_err(|reason| BondwatchError::ExternalServiceUnavailable { reason })
    }
}

pub fn make_bond(
    id: u32,
    bond_type: BondType,
    tenor_years: u32,
    coupon_rate_percent: f64,
    price: f64,
) -> BondTerms {
    let issue_date = date(2024, 1, 1);
    BondTerms {
        id: BondId(id),
        issue_number: format!("TEST{id}"),
        isin: format!("KE{id:010}"),
        issue_date,
        maturity_date: date(2024 + tenor_years as i32, 1, 1),
        bond_type,
        tenor_years,
        coupon_rate_percent,
        price,
        description: String::new(),
    }
}

/// The three-year FXD bond used for the worked returns example.
pub fn scenario_bond() -> BondTerms {
    BondTerms {
        id: BondId(1),
        issue_number: "FXD1/2023/03".into(),
        isin: "KE5000009653".into(),
        issue_date: date(2023, 4, 10),
        maturity_date: date(2026, 4, 6),
        bond_type: BondType::FixedRate,
        tenor_years: 3,
        coupon_rate_percent: 16.537,
        price: 101.76,
        description: "3-Year Fixed Bond".into(),
    }
}

pub fn new_bond(issue_number: &str, bond_type: BondType, tenor_years: u32, price: f64) -> NewBond {
    NewBond {
        issue_number: issue_number.to_string(),
        isin: None,
        bond_type,
        tenor_years,
        coupon_rate_percent: 12.0,
        price,
        issue_date: date(2025, 6, 1),
        maturity_date: None,
        description: None,
    }
}
