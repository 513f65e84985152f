//! Domain error types.

use std::time::Duration;

/// Top-level error type for bondwatch.
#[derive(Debug, thiserror::Error)]
pub enum BondwatchError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("bond data error: {reason}")]
    BondData { reason: String },

    #[error("no bond with id {id}")]
    UnknownBond { id: u32 },

    #[error("external service unavailable: {reason}")]
    ExternalServiceUnavailable { reason: String },

    #[error("external service timed out after {}s", after.as_secs())]
    ExternalTimeout { after: Duration },

    #[error("{surface} request already in flight")]
    Busy { surface: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BondwatchError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        BondwatchError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&BondwatchError> for std::process::ExitCode {
    fn from(err: &BondwatchError) -> Self {
        let code: u8 = match err {
            BondwatchError::Io(_) => 1,
            BondwatchError::ConfigParse { .. }
            | BondwatchError::ConfigMissing { .. }
            | BondwatchError::ConfigInvalid { .. } => 2,
            BondwatchError::InvalidInput { .. } => 3,
            BondwatchError::BondData { .. } | BondwatchError::UnknownBond { .. } => 4,
            BondwatchError::ExternalServiceUnavailable { .. }
            | BondwatchError::ExternalTimeout { .. }
            | BondwatchError::Busy { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
