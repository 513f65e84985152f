//! Text generation port for the AI tutor and analyst.

use crate::domain::error::BondwatchError;

/// One-shot prompt in, text out.
pub trait ExplainPort {
    fn generate(&self, prompt: &str) -> Result<String, BondwatchError>;
}
