//! Formula values and the heuristics applied to them before they reach a cell.

pub mod classifier;
pub mod format;

pub use classifier::{is_date_formula, matching_date_function};
pub use format::{number_format_for, DateFormat, InsertConfig};

use serde::Serialize;
use thiserror::Error;

/// Leading character every spreadsheet formula must carry.
pub const FORMULA_MARKER: char = '=';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("formula must start with '{}'", FORMULA_MARKER)]
pub struct MissingFormulaMarker;

/// A generated formula together with its short explanation.
///
/// The formula always starts with [`FORMULA_MARKER`]; there is no way to
/// build one that does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaResult {
    formula: String,
    explanation: String,
}

impl FormulaResult {
    pub fn new(
        formula: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, MissingFormulaMarker> {
        let formula = formula.into();
        if !formula.starts_with(FORMULA_MARKER) {
            return Err(MissingFormulaMarker);
        }
        Ok(Self {
            formula,
            explanation: explanation.into(),
        })
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn into_parts(self) -> (String, String) {
        (self.formula, self.explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_marked_formula() {
        let result = FormulaResult::new("=SUM(A1:A3)", "Adds three cells.").unwrap();
        assert_eq!(result.formula(), "=SUM(A1:A3)");
        assert_eq!(result.explanation(), "Adds three cells.");
    }

    #[test]
    fn rejects_unmarked_formula() {
        assert_eq!(
            FormulaResult::new("SUM(A1:A3)", ""),
            Err(MissingFormulaMarker)
        );
        assert!(FormulaResult::new(" =SUM(A1)", "").is_err());
        assert!(FormulaResult::new("", "").is_err());
    }
}
