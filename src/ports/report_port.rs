//! Report generation port.

use std::path::Path;

use crate::domain::analytics::{AnalyzedBond, EvaluationContext};
use crate::domain::error::BondwatchError;

/// Port for writing a ranked analysis.
pub trait ReportPort {
    fn write(
        &self,
        bonds: &[AnalyzedBond],
        ctx: &EvaluationContext,
        output_path: &Path,
    ) -> Result<(), BondwatchError>;
}
