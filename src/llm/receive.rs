//! Interpretation of completion text.

use crate::formula::{FormulaResult, FORMULA_MARKER};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Completion text was empty")]
    Empty,
    #[error("First line does not start with '{}': {first_line}", FORMULA_MARKER)]
    MissingMarker { first_line: String },
}

/// Splits completion text into formula (first line) and explanation
/// (everything after, trimmed).
pub fn parse_completion(text: &str) -> Result<FormulaResult, CompletionError> {
    let content = text.trim();
    if content.is_empty() {
        return Err(CompletionError::Empty);
    }

    let (first_line, rest) = match content.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (content, ""),
    };
    let formula = first_line.strip_suffix('\r').unwrap_or(first_line);
    let explanation = rest.trim();

    FormulaResult::new(formula, explanation).map_err(|_| {
        warn!(first_line = %truncate(formula, 80), "Completion did not start with a formula");
        CompletionError::MissingMarker {
            first_line: formula.to_string(),
        }
    })
}

/// At most `max_chars` characters of `text`.
pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_formula_and_explanation() {
        let result = parse_completion("=SUM(A1:A10)\nAdds up the values.").unwrap();
        assert_eq!(result.formula(), "=SUM(A1:A10)");
        assert_eq!(result.explanation(), "Adds up the values.");
    }

    #[test]
    fn explanation_may_span_lines_and_is_trimmed() {
        let result = parse_completion("  =A1*2\n\n  Doubles A1.\nWorks on numbers.  \n").unwrap();
        assert_eq!(result.formula(), "=A1*2");
        assert_eq!(result.explanation(), "Doubles A1.\nWorks on numbers.");
    }

    #[test]
    fn explanation_may_be_empty() {
        let result = parse_completion("=NOW()").unwrap();
        assert_eq!(result.formula(), "=NOW()");
        assert_eq!(result.explanation(), "");
    }

    #[test]
    fn crlf_line_endings_are_stripped_from_formula() {
        let result = parse_completion("=TODAY()\r\nCurrent date.").unwrap();
        assert_eq!(result.formula(), "=TODAY()");
        assert_eq!(result.explanation(), "Current date.");
    }

    #[test]
    fn prose_reply_is_rejected() {
        assert_eq!(
            parse_completion("The total is 5"),
            Err(CompletionError::MissingMarker {
                first_line: "The total is 5".to_string()
            })
        );
    }

    #[test]
    fn formula_on_second_line_is_still_rejected() {
        assert!(parse_completion("Here you go:\n=SUM(A1:A3)").is_err());
    }

    #[test]
    fn blank_reply_is_empty() {
        assert_eq!(parse_completion("  \n "), Err(CompletionError::Empty));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 4), "héll");
        assert_eq!(truncate("short", 50), "short");
    }
}
