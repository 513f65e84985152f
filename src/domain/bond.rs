//! Bond term sheet representation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::BondwatchError;

/// Price of the bond at par, per 100 face value.
pub const PAR: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BondId(pub u32);

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondType {
    #[serde(rename = "FXD")]
    FixedRate,
    #[serde(rename = "IFB")]
    InfrastructureBond,
}

impl BondType {
    pub fn code(&self) -> &'static str {
        match self {
            BondType::FixedRate => "FXD",
            BondType::InfrastructureBond => "IFB",
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for BondType {
    type Err = BondwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FXD" | "FIXED" | "FIXEDRATE" => Ok(BondType::FixedRate),
            "IFB" | "INFRASTRUCTURE" | "INFRASTRUCTUREBOND" => Ok(BondType::InfrastructureBond),
            other => Err(BondwatchError::invalid_input(format!(
                "unknown bond type '{other}' (expected FXD or IFB)"
            ))),
        }
    }
}

/// Term sheet of a single instrument. Never mutated after creation;
/// re-pricing goes through [`BondTerms::with_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    pub id: BondId,
    pub issue_number: String,
    pub isin: String,
    pub issue_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub bond_type: BondType,
    pub tenor_years: u32,
    pub coupon_rate_percent: f64,
    pub price: f64,
    pub description: String,
}

impl BondTerms {
    /// Copy of this bond quoted at a new clean price.
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    pub fn is_discount(&self) -> bool {
        self.price < PAR
    }

    pub fn is_premium(&self) -> bool {
        self.price > PAR
    }

    pub fn validate(&self) -> Result<(), BondwatchError> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(BondwatchError::invalid_input(format!(
                "bond {} ({}): price must be positive, got {}",
                self.id, self.issue_number, self.price
            )));
        }
        if !self.coupon_rate_percent.is_finite() || self.coupon_rate_percent < 0.0 {
            return Err(BondwatchError::invalid_input(format!(
                "bond {} ({}): coupon rate must be non-negative, got {}",
                self.id, self.issue_number, self.coupon_rate_percent
            )));
        }
        if self.tenor_years == 0 {
            return Err(BondwatchError::invalid_input(format!(
                "bond {} ({}): tenor must be at least one year",
                self.id, self.issue_number
            )));
        }
        if self.maturity_date <= self.issue_date {
            return Err(BondwatchError::invalid_input(format!(
                "bond {} ({}): maturity date {} is not after issue date {}",
                self.id, self.issue_number, self.maturity_date, self.issue_date
            )));
        }
        Ok(())
    }
}
