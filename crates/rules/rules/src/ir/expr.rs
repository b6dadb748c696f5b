use std::fmt;
use std::str::FromStr;

use rulebook_core::text::{eq_ignore_case, split_list};
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Literal that marks a column as unconstrained.
pub const WILDCARD_LITERAL: &str = "Not Used";

/// Prefix that introduces an exclusion list: `<>(v1,v2,...)`.
pub const EXCLUSION_PREFIX: &str = "<>";

/// A parsed rule-book cell.
///
/// Every variant compares case-insensitively against a trimmed candidate
/// value. The tree is serializable so a built rule set can be stored and
/// re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum RuleExpression {
    /// `Not Used`: any value, including empty.
    Wildcard,
    /// `<>(a,b)`: any value not in the list.
    Exclusion(Vec<String>),
    /// `a,b`: any value in the list.
    AnyOf(Vec<String>),
    /// A single literal.
    Exact(String),
}

impl RuleExpression {
    /// Parse a raw rule-book cell.
    ///
    /// Resolution order: wildcard literal, exclusion prefix, comma list,
    /// exact literal. The exclusion body may be wrapped in one pair of
    /// parentheses; an unbalanced pair is a [`RuleError::Format`].
    pub fn parse(raw: &str) -> Result<Self, RuleError> {
        let expected = raw.trim();

        if eq_ignore_case(expected, WILDCARD_LITERAL) {
            return Ok(Self::Wildcard);
        }

        if let Some(rest) = expected.strip_prefix(EXCLUSION_PREFIX) {
            let body = strip_parens(rest.trim(), expected)?;
            return Ok(Self::Exclusion(tokens(body)));
        }

        if expected.contains(',') {
            return Ok(Self::AnyOf(tokens(expected)));
        }

        Ok(Self::Exact(expected.to_owned()))
    }

    /// Returns `true` if `actual` satisfies this expression.
    pub fn accepts(&self, actual: &str) -> bool {
        let actual = actual.trim();
        match self {
            Self::Wildcard => true,
            Self::Exclusion(excluded) => !excluded.iter().any(|v| eq_ignore_case(v, actual)),
            Self::AnyOf(allowed) => allowed.iter().any(|v| eq_ignore_case(v, actual)),
            Self::Exact(expected) => eq_ignore_case(expected, actual),
        }
    }

    /// Returns `true` for [`RuleExpression::Wildcard`].
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

fn tokens(list: &str) -> Vec<String> {
    split_list(list).map(str::to_owned).collect()
}

/// Strip one pair of wrapping parentheses from an exclusion body.
fn strip_parens<'a>(body: &'a str, expected: &str) -> Result<&'a str, RuleError> {
    match (body.strip_prefix('('), body.strip_suffix(')')) {
        (Some(_), Some(_)) => Ok(body[1..body.len() - 1].trim()),
        (Some(_), None) => Err(RuleError::Format(format!(
            "unbalanced exclusion `{expected}`: missing `)`"
        ))),
        (None, Some(_)) => Err(RuleError::Format(format!(
            "unbalanced exclusion `{expected}`: missing `(`"
        ))),
        (None, None) => Ok(body),
    }
}

impl FromStr for RuleExpression {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders the canonical rule-book syntax.
impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(WILDCARD_LITERAL),
            Self::Exclusion(values) => write!(f, "{EXCLUSION_PREFIX}({})", values.join(",")),
            Self::AnyOf(values) => f.write_str(&values.join(",")),
            Self::Exact(value) => f.write_str(value),
        }
    }
}
