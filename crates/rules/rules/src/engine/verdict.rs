use serde::{Deserialize, Serialize};

use crate::ir::rule::RuleRow;

/// The outcome of validating one candidate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether some rule row accepted the candidate.
    pub matched: bool,
    /// The accepting rule row; on a mismatch, the last rule row compared
    /// when the engine surfaces it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<RuleRow>,
    /// On a mismatch, the first column the surfaced rule row rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatched_column: Option<String>,
}

impl Verdict {
    pub(crate) fn matched(rule: RuleRow) -> Self {
        Self {
            matched: true,
            matched_rule: Some(rule),
            mismatched_column: None,
        }
    }

    pub(crate) fn mismatched(rule: RuleRow, column: String) -> Self {
        Self {
            matched: false,
            matched_rule: Some(rule),
            mismatched_column: Some(column),
        }
    }

    pub(crate) fn no_match() -> Self {
        Self {
            matched: false,
            matched_rule: None,
            mismatched_column: None,
        }
    }

    /// `"Correct"` or `"Wrong"`, the labels written to annotated output.
    pub fn label(&self) -> &'static str {
        if self.matched { "Correct" } else { "Wrong" }
    }
}
