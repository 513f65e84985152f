//! Source of user-supplied bond term sheets.

use crate::domain::catalog::NewBond;
use crate::domain::error::BondwatchError;

pub trait BondSourcePort {
    fn load_bonds(&self) -> Result<Vec<NewBond>, BondwatchError>;
}
