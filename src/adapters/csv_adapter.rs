//! CSV bond file adapter.
//!
//! Columns: `issue_number,isin,issue_date,maturity_date,type,tenor_years,
//! coupon_rate_percent,price,description`. `isin`, `maturity_date` and
//! `description` may be left empty.

use crate::domain::bond::BondType;
use crate::domain::catalog::NewBond;
use crate::domain::error::BondwatchError;
use crate::ports::bond_source_port::BondSourcePort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: usize = 9;

pub struct CsvBondAdapter {
    path: PathBuf,
}

impl CsvBondAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(content: &str) -> Result<Vec<NewBond>, BondwatchError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bonds = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            // header is line 1
            let line = i + 2;
            let record = result.map_err(|e| BondwatchError::BondData {
                reason: format!("CSV parse error: {}", e),
            })?;
            if record.len() < COLUMNS {
                return Err(BondwatchError::BondData {
                    reason: format!(
                        "line {}: expected {} columns, found {}",
                        line,
                        COLUMNS,
                        record.len()
                    ),
                });
            }
            bonds.push(parse_record(&record, line)?);
        }

        Ok(bonds)
    }
}

fn field<'a>(
    record: &'a StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'a str, BondwatchError> {
    record
        .get(idx)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BondwatchError::BondData {
            reason: format!("line {}: missing {} column", line, name),
        })
}

fn optional(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(value: &str, name: &str, line: usize) -> Result<NaiveDate, BondwatchError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| BondwatchError::BondData {
        reason: format!("line {}: invalid {} '{}': {}", line, name, value, e),
    })
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    name: &str,
    line: usize,
) -> Result<T, BondwatchError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| BondwatchError::BondData {
        reason: format!("line {}: invalid {} value '{}': {}", line, name, value, e),
    })
}

fn parse_record(record: &StringRecord, line: usize) -> Result<NewBond, BondwatchError> {
    let issue_number = field(record, 0, "issue_number", line)?.to_string();
    let issue_date = parse_date(field(record, 2, "issue_date", line)?, "issue_date", line)?;
    let maturity_date = match optional(record, 3) {
        Some(v) => Some(parse_date(&v, "maturity_date", line)?),
        None => None,
    };
    let bond_type: BondType = field(record, 4, "type", line)?
        .parse()
        .map_err(|e: BondwatchError| BondwatchError::BondData {
            reason: format!("line {}: {}", line, e),
        })?;

    Ok(NewBond {
        issue_number,
        isin: optional(record, 1),
        bond_type,
        tenor_years: parse_number(field(record, 5, "tenor_years", line)?, "tenor_years", line)?,
        coupon_rate_percent: parse_number(
            field(record, 6, "coupon_rate_percent", line)?,
            "coupon_rate_percent",
            line,
        )?,
        price: parse_number(field(record, 7, "price", line)?, "price", line)?,
        issue_date,
        maturity_date,
        description: optional(record, 8),
    })
}

impl BondSourcePort for CsvBondAdapter {
    fn load_bonds(&self) -> Result<Vec<NewBond>, BondwatchError> {
        let content = fs::read_to_string(&self.path).map_err(|e| BondwatchError::BondData {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let bonds = Self::parse(&content)?;
        debug!(path = %self.path.display(), count = bonds.len(), "loaded bond file");
        Ok(bonds)
    }
}
