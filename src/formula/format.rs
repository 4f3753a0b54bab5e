//! Cell number formats applied when a formula is written to the host.

use super::classifier::is_date_formula;
use serde::{Deserialize, Serialize};

/// Regional date display presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    #[default]
    Us,
    Europe,
    Iso,
    Short,
    Long,
}

impl DateFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Us => "mm/dd/yyyy",
            DateFormat::Europe => "dd/mm/yyyy",
            DateFormat::Iso => "yyyy-mm-dd",
            DateFormat::Short => "m/d/yy",
            DateFormat::Long => "mmmm dd, yyyy",
        }
    }
}

/// Formatting behaviour of the insert action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertConfig {
    /// Also format non-date formulas, using `default_number_format`.
    pub always_set_number_format: bool,
    pub date_format: DateFormat,
    pub default_number_format: String,
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            always_set_number_format: false,
            date_format: DateFormat::default(),
            default_number_format: "General".to_string(),
        }
    }
}

/// Number format to apply alongside `formula`, or `None` to leave the cell's
/// formatting untouched.
pub fn number_format_for(formula: &str, config: &InsertConfig) -> Option<String> {
    if is_date_formula(formula) {
        Some(config.date_format.pattern().to_string())
    } else if config.always_set_number_format {
        Some(config.default_number_format.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_formula_gets_date_pattern() {
        let config = InsertConfig::default();
        assert_eq!(
            number_format_for("=TODAY()", &config).as_deref(),
            Some("mm/dd/yyyy")
        );
    }

    #[test]
    fn other_formulas_untouched_by_default() {
        assert_eq!(number_format_for("=SUM(A1:A4)", &InsertConfig::default()), None);
    }

    #[test]
    fn always_set_uses_default_number_format() {
        let config = InsertConfig {
            always_set_number_format: true,
            date_format: DateFormat::Iso,
            ..InsertConfig::default()
        };
        assert_eq!(number_format_for("=SUM(A1:A4)", &config).as_deref(), Some("General"));
        assert_eq!(number_format_for("=EDATE(A1,1)", &config).as_deref(), Some("yyyy-mm-dd"));
    }

    #[test]
    fn presets_cover_all_regions() {
        assert_eq!(DateFormat::Europe.pattern(), "dd/mm/yyyy");
        assert_eq!(DateFormat::Short.pattern(), "m/d/yy");
        assert_eq!(DateFormat::Long.pattern(), "mmmm dd, yyyy");
    }
}
