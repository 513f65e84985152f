//! Synthetic market feed.
//!
//! Stands in for the NSE daily bond price sheet: prices are the catalog
//! price plus a smooth per-bond, per-day offset `sin(id * day) * 1.5` and a
//! small uniform jitter. This is demo variability, not a pricing model.

use std::thread;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::domain::bond::BondTerms;
use crate::domain::error::BondwatchError;
use crate::domain::request_gate::RequestGate;
use crate::ports::random_port::JitterSource;

pub const DEFAULT_NSE_HOST: &str = "www.nse.co.ke";
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(2000);

const PRICE_SWING: f64 = 1.5;
const JITTER: f64 = 0.1;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Re-price every bond for `date`. The input catalog is left untouched.
pub fn derive_prices_for_date(
    catalog: &[BondTerms],
    date: NaiveDate,
    jitter: &mut dyn JitterSource,
) -> Vec<BondTerms> {
    let day = f64::from(date.day());
    catalog
        .iter()
        .map(|bond| {
            let offset = (f64::from(bond.id.0) * day).sin() * PRICE_SWING;
            let noise = jitter.uniform(-JITTER, JITTER);
            bond.with_price(round2(bond.price + offset + noise))
        })
        .collect()
}

/// `DD-MON-YYYY`, e.g. `07-JAN-2026`.
pub fn format_nse_date(date: NaiveDate) -> String {
    format!(
        "{:02}-{}-{}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

pub fn nse_pdf_url(host: &str, date: NaiveDate) -> String {
    format!(
        "https://{}/wp-content/uploads/BondPrices_{}.pdf",
        host.trim_end_matches('/'),
        format_nse_date(date)
    )
}

/// Simulated fetch of the daily price sheet.
pub struct MarketFeed {
    host: String,
    delay: Duration,
    gate: RequestGate,
}

impl MarketFeed {
    pub fn new(host: impl Into<String>, delay: Duration) -> Self {
        Self {
            host: host.into(),
            delay,
            gate: RequestGate::new("market feed"),
        }
    }

    pub fn source_url(&self, date: NaiveDate) -> String {
        nse_pdf_url(&self.host, date)
    }

    pub fn is_syncing(&self) -> bool {
        self.gate.is_busy()
    }

    /// Wait out the simulated download, then return re-priced bonds.
    /// Rejected with `Busy` while another refresh is running.
    pub fn refresh(
        &self,
        catalog: &[BondTerms],
        date: NaiveDate,
        jitter: &mut dyn JitterSource,
    ) -> Result<Vec<BondTerms>, BondwatchError> {
        let _permit = self.gate.try_acquire()?;
        info!(url = %self.source_url(date), "fetching bond price sheet");
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let repriced = derive_prices_for_date(catalog, date, jitter);
        info!(bonds = repriced.len(), date = %date, "price sheet loaded");
        Ok(repriced)
    }
}

impl Default for MarketFeed {
    fn default() -> Self {
        Self::new(DEFAULT_NSE_HOST, DEFAULT_REFRESH_DELAY)
    }
}
