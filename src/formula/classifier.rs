//! Date-result detection for generated formulas.
//!
//! This is a substring heuristic over the upper-cased formula text, not a
//! parse. A marker inside a string literal or at the tail of a longer name
//! (`MYDAY(`) still counts as a match.

use tracing::debug;

/// Call markers of functions whose result is a date or a date part.
const DATE_FUNCTIONS: &[&str] = &[
    "TODAY()",
    "NOW()",
    "DATE(",
    "EDATE(",
    "EOMONTH(",
    "WORKDAY(",
    "WORKDAY.INTL(",
    "NETWORKDAYS(",
    "NETWORKDAYS.INTL(",
    "YEAR(",
    "MONTH(",
    "DAY(",
    "WEEKDAY(",
    "WEEKNUM(",
    "ISOWEEKNUM(",
    "QUARTER(",
    "DATEDIF(",
    "DAYS(",
    "DAYS360(",
    "YEARFRAC(",
    "DATEVALUE(",
    "TIMEVALUE(",
    "HOUR(",
    "MINUTE(",
    "SECOND(",
    "TIME(",
];

/// First date marker found in `formula`, if any.
pub fn matching_date_function(formula: &str) -> Option<&'static str> {
    let upper = formula.to_uppercase();
    DATE_FUNCTIONS
        .iter()
        .copied()
        .find(|marker| upper.contains(marker))
}

pub fn is_date_formula(formula: &str) -> bool {
    match matching_date_function(formula) {
        Some(marker) => {
            debug!(marker, "Date function detected");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_aggregates_are_not_dates() {
        assert!(!is_date_formula("=SUM(A1:A10)"));
        assert!(!is_date_formula("=AVERAGE(B2:B9)*2"));
        assert!(!is_date_formula("=VLOOKUP(A2,Sheet2!A:B,2,FALSE)"));
    }

    #[test]
    fn date_functions_are_detected() {
        assert!(is_date_formula("=TODAY()"));
        assert!(is_date_formula("=YEAR(A1)+1"));
        assert!(is_date_formula("=NETWORKDAYS(A1,B1)"));
        assert!(is_date_formula("=WORKDAY.INTL(A1,5,11)"));
        assert!(is_date_formula("=EOMONTH(A1,0)"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_date_formula("=today()"));
        assert!(is_date_formula("=Edate(a1, 3)"));
    }

    #[test]
    fn zero_argument_forms_need_empty_parens() {
        assert!(!is_date_formula("=NOW"));
        assert!(is_date_formula("=NOW()-A1"));
    }

    #[test]
    fn substring_false_positives_are_kept() {
        // Marker inside a string literal.
        assert!(is_date_formula("=CONCAT(\"DAY(\", A1)"));
        // Marker at the tail of a user-defined name.
        assert!(is_date_formula("=MYDAY(A1)"));
    }

    #[test]
    fn reports_the_first_listed_marker() {
        assert_eq!(matching_date_function("=TEXT(TODAY(),\"yyyy\")"), Some("TODAY()"));
        assert_eq!(matching_date_function("=WEEKDAY(A1)"), Some("DAY("));
        assert_eq!(matching_date_function("=A1+B1"), None);
    }
}
