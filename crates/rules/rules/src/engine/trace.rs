use serde::{Deserialize, Serialize};

use super::verdict::Verdict;

/// Result of comparing a candidate against a single rule row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleTraceResult {
    /// Every constrained column accepted the candidate.
    Matched,
    /// At least one column rejected the candidate.
    NotMatched,
    /// Not compared because an earlier rule row already matched.
    Skipped,
}

impl RuleTraceResult {
    /// The serialized name of this result.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NotMatched => "not_matched",
            Self::Skipped => "skipped",
        }
    }
}

/// Trace entry for a single rule row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleTraceEntry {
    /// Line of the rule row in the rule table.
    pub line: usize,
    pub result: RuleTraceResult,
    /// The first rejecting column, for `not_matched` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_column: Option<String>,
    /// The rule-book expression of the rejecting column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// The candidate's value in the rejecting column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

/// Complete trace of validating one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationTrace {
    pub identifier: String,
    /// The verdict, identical to what [`validate`](crate::RuleEngine::validate) returns.
    pub verdict: Verdict,
    /// Number of rule rows actually compared.
    pub total_rules_evaluated: usize,
    /// Number of rule rows skipped after the first match.
    pub total_rules_skipped: usize,
    /// Per-rule entries in table order.
    pub trace: Vec<RuleTraceEntry>,
}
