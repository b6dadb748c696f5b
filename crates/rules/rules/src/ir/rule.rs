use rulebook_core::text::eq_ignore_case;
use serde::{Deserialize, Serialize};

use super::expr::RuleExpression;
use crate::error::RuleError;

/// A single constrained column of a rule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleColumn {
    /// Column name as spelled in the rule table header.
    pub name: String,
    /// The cell exactly as read (trimmed).
    pub raw: String,
    /// The parsed expression.
    pub expression: RuleExpression,
}

impl RuleColumn {
    /// Parse `raw` into a constrained column.
    pub fn parse(name: impl Into<String>, raw: impl Into<String>) -> Result<Self, RuleError> {
        let raw = raw.into();
        let expression = RuleExpression::parse(&raw)?;
        Ok(Self {
            name: name.into(),
            raw,
            expression,
        })
    }
}

/// One row of the rule book: the constraints that apply to candidates
/// carrying `identifier`.
///
/// Several rule rows may share an identifier; they are alternatives tried in
/// table order. Columns are kept in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow {
    /// The business identifier (billing code) this row applies to.
    pub identifier: String,
    /// 1-based line in the rule table, 0 when built in code.
    #[serde(default)]
    pub line: usize,
    /// Constrained columns. Columns not listed are unconstrained.
    pub columns: Vec<RuleColumn>,
}

impl RuleRow {
    /// Create a rule row with no constraints.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            line: 0,
            columns: Vec::new(),
        }
    }

    /// Set the source line of this rule row.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Add a constraint parsed from `raw`.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        raw: impl Into<String>,
    ) -> Result<Self, RuleError> {
        self.columns.push(RuleColumn::parse(name, raw)?);
        Ok(self)
    }

    /// Look up a constrained column by name, case-insensitively.
    pub fn column(&self, name: &str) -> Option<&RuleColumn> {
        self.columns.iter().find(|c| eq_ignore_case(&c.name, name))
    }

    /// The parsed expression for `name`, if constrained.
    pub fn expression(&self, name: &str) -> Option<&RuleExpression> {
        self.column(name).map(|c| &c.expression)
    }

    /// The raw cell for `name`, if constrained.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.column(name).map(|c| c.raw.as_str())
    }

    /// Returns `true` if every column is a wildcard (or there are none).
    pub fn is_unconstrained(&self) -> bool {
        self.columns.iter().all(|c| c.expression.is_wildcard())
    }
}

/// A rule-table row that was left out of the rule set because one of its
/// cells could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    /// 1-based line in the rule table.
    pub line: usize,
    pub identifier: String,
    /// The column holding the malformed expression.
    pub column: String,
    pub raw: String,
    /// Rendered parse error.
    pub reason: String,
}
