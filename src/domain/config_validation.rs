//! Configuration validation.
//!
//! Every key is optional, but a key that is present must be well formed.
//! Validation runs before any settings are built.

use std::str::FromStr;

use crate::domain::error::BondwatchError;
use crate::domain::ranking::RankMetric;
use crate::ports::config_port::ConfigPort;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    validate_dates(config)?;
    validate_investment_amount(config)?;
    validate_sort_by(config)?;
    validate_feed(config)?;
    validate_ai(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> BondwatchError {
    BondwatchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// A present, non-blank value parsed as `T`.
pub(crate) fn parse_value<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, BondwatchError> {
    match config
        .get_string(section, key)
        .filter(|v| !v.trim().is_empty())
    {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("cannot parse '{}'", raw.trim()))),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    config.get_date("analysis", "as_of_date")?;
    config.get_date("analysis", "yield_reference_date")?;
    Ok(())
}

fn validate_investment_amount(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    if let Some(amount) = parse_value::<f64>(config, "analysis", "investment_amount")? {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(invalid(
                "analysis",
                "investment_amount",
                "investment_amount must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_sort_by(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    parse_value::<RankMetric>(config, "analysis", "sort_by")?;
    Ok(())
}

fn validate_feed(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    if let Some(host) = config.get_string("feed", "host") {
        let host = host.trim();
        if host.is_empty() || host.contains(char::is_whitespace) || host.contains("://") {
            return Err(invalid(
                "feed",
                "host",
                "host must be a bare host name such as www.nse.co.ke",
            ));
        }
    }
    if let Some(delay) = parse_value::<i64>(config, "feed", "refresh_delay_ms")? {
        if delay < 0 {
            return Err(invalid(
                "feed",
                "refresh_delay_ms",
                "refresh_delay_ms must be non-negative",
            ));
        }
    }
    parse_value::<u64>(config, "feed", "seed")?;
    Ok(())
}

fn validate_ai(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    if let Some(secs) = parse_value::<i64>(config, "ai", "timeout_secs")? {
        if secs <= 0 {
            return Err(invalid("ai", "timeout_secs", "timeout_secs must be positive"));
        }
    }
    if let Some(var) = config.get_string("ai", "api_key_env") {
        if var.trim().is_empty() || var.contains('=') {
            return Err(invalid(
                "ai",
                "api_key_env",
                "api_key_env must name an environment variable",
            ));
        }
    }
    Ok(())
}

fn validate_logging(config: &dyn ConfigPort) -> Result<(), BondwatchError> {
    if let Some(level) = config.get_string("logging", "level") {
        if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
            return Err(invalid(
                "logging",
                "level",
                format!(
                    "unknown level '{}' (expected one of {})",
                    level.trim(),
                    LOG_LEVELS.join(", ")
                ),
            ));
        }
    }
    Ok(())
}
