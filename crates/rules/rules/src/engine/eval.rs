use rulebook_core::text::split_list;
use serde::{Deserialize, Serialize};

use crate::engine::candidate::CellLookup;
use crate::error::RuleError;
use crate::ir::expr::RuleExpression;
use crate::ir::rule::{RuleColumn, RuleRow};

/// How a candidate cell is interpreted before matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateCells {
    /// The whole cell is one value.
    #[default]
    Single,
    /// A comma-separated cell holds several values; the column matches if
    /// any one of them satisfies the expression.
    MultiValue,
}

/// Check a raw rule-book expression against an observed value.
///
/// Parses `expected` on every call; prefer [`RuleExpression::accepts`] when
/// evaluating the same expression repeatedly.
pub fn evaluate(expected: &str, actual: &str) -> Result<bool, RuleError> {
    Ok(RuleExpression::parse(expected)?.accepts(actual))
}

/// Check one parsed expression against a candidate cell.
pub fn accepts_cell(expression: &RuleExpression, actual: &str, cells: CandidateCells) -> bool {
    match cells {
        CandidateCells::Single => expression.accepts(actual),
        CandidateCells::MultiValue => {
            let mut values = split_list(actual).peekable();
            if values.peek().is_none() {
                expression.accepts("")
            } else {
                values.any(|v| expression.accepts(v))
            }
        }
    }
}

/// The first column of `rule` the candidate does not satisfy, or `None` if
/// the whole rule row matches.
pub fn first_mismatch<'r, C: CellLookup + ?Sized>(
    rule: &'r RuleRow,
    candidate: &C,
    cells: CandidateCells,
) -> Option<&'r RuleColumn> {
    rule.columns
        .iter()
        .find(|column| !accepts_cell(&column.expression, candidate.lookup(&column.name), cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::candidate::CandidateRow;

    #[test]
    fn evaluate_not_used_accepts_any_value() {
        for expected in ["Not Used", "not used", "NOT USED"] {
            assert!(evaluate(expected, "anything").unwrap());
            assert!(evaluate(expected, "").unwrap());
        }
    }

    #[test]
    fn evaluate_exclusion() {
        assert!(!evaluate("<>(a,b,c)", "a").unwrap());
        assert!(!evaluate("<>(a,b,c)", "A").unwrap());
        assert!(evaluate("<>(a,b,c)", "z").unwrap());
    }

    #[test]
    fn evaluate_any_of() {
        for actual in ["a", "B", " c "] {
            assert!(evaluate("a,b,c", actual).unwrap(), "{actual}");
        }
        assert!(!evaluate("a,b,c", "d").unwrap());
        assert!(!evaluate("a,b,c", "a,b").unwrap());
    }

    #[test]
    fn evaluate_exact() {
        assert!(evaluate("USD", "usd").unwrap());
        assert!(!evaluate("USD", "USDX").unwrap());
    }

    #[test]
    fn evaluate_malformed_exclusion_is_error() {
        assert!(matches!(
            evaluate("<>(a,b", "a"),
            Err(RuleError::Format(_))
        ));
    }

    #[test]
    fn multi_value_cells_match_existentially() {
        let any_of = RuleExpression::parse("G,H").unwrap();
        assert!(accepts_cell(&any_of, "I, H", CandidateCells::MultiValue));
        assert!(!accepts_cell(&any_of, "I, J", CandidateCells::MultiValue));
        assert!(!accepts_cell(&any_of, "I, H", CandidateCells::Single));

        let exclusion = RuleExpression::parse("<>(X,Y)").unwrap();
        assert!(accepts_cell(&exclusion, "X,Z", CandidateCells::MultiValue));
        assert!(!accepts_cell(&exclusion, "X,Y", CandidateCells::MultiValue));
    }

    #[test]
    fn multi_value_blank_cell_is_empty_value() {
        assert!(accepts_cell(
            &RuleExpression::Wildcard,
            " , ",
            CandidateCells::MultiValue
        ));
        let exact_blank = RuleExpression::Exact(String::new());
        assert!(accepts_cell(&exact_blank, "", CandidateCells::MultiValue));
    }

    #[test]
    fn first_mismatch_reports_failing_column() {
        let rule = RuleRow::new("B1")
            .with_column("Currency", "USD")
            .unwrap()
            .with_column("Status", "open,closed")
            .unwrap();

        let ok = CandidateRow::new("B1")
            .with_value("Currency", "usd")
            .with_value("Status", "Closed");
        assert!(first_mismatch(&rule, &ok, CandidateCells::Single).is_none());

        let bad = CandidateRow::new("B1").with_value("Currency", "USD");
        let column = first_mismatch(&rule, &bad, CandidateCells::Single).unwrap();
        assert_eq!(column.name, "Status");
    }
}
