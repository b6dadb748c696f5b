use std::collections::BTreeMap;

use rulebook_core::text::{eq_ignore_case, fold_case};
use rulebook_core::{Table, TabularSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RuleError;
use crate::ir::rule::{RuleColumn, RuleRow, SkippedRule};

/// How candidate identifiers are matched against rule-book identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMatch {
    /// Byte-for-byte equality.
    #[default]
    Exact,
    /// Equality after lowercasing both sides.
    CaseInsensitive,
}

impl IdentifierMatch {
    fn key(self, identifier: &str) -> String {
        match self {
            Self::Exact => identifier.to_owned(),
            Self::CaseInsensitive => fold_case(identifier),
        }
    }
}

/// An immutable, ordered multimap from identifier to rule rows.
///
/// Rows sharing an identifier keep their rule-table order, which is the
/// order the validator tries them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    identifier_column: String,
    #[serde(default)]
    identifier_match: IdentifierMatch,
    rules: BTreeMap<String, Vec<RuleRow>>,
    #[serde(default)]
    skipped: Vec<SkippedRule>,
}

impl RuleSet {
    /// Build a rule set from a rule table with default options.
    pub fn build(table: &Table, identifier_column: &str) -> Result<Self, RuleError> {
        RuleSetBuilder::new(identifier_column).build(table)
    }

    /// Read a rule table from `source` and build a rule set from it.
    pub fn load(
        source: &mut impl TabularSource,
        identifier_column: &str,
    ) -> Result<Self, RuleError> {
        RuleSetBuilder::new(identifier_column).load(source)
    }

    /// Name of the column holding identifiers.
    pub fn identifier_column(&self) -> &str {
        &self.identifier_column
    }

    pub fn identifier_match(&self) -> IdentifierMatch {
        self.identifier_match
    }

    /// Rule rows for `identifier` in table order, or `None` if the rule book
    /// does not mention it.
    pub fn rules_for(&self, identifier: &str) -> Option<&[RuleRow]> {
        self.rules
            .get(&self.identifier_match.key(identifier))
            .map(Vec::as_slice)
    }

    /// Returns `true` if the rule book mentions `identifier`.
    pub fn contains(&self, identifier: &str) -> bool {
        self.rules_for(identifier).is_some()
    }

    /// `(identifier, rows)` pairs in ascending identifier order.
    ///
    /// The identifier is spelled as in the first rule row carrying it.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleRow])> {
        self.rules.iter().map(|(key, rows)| {
            let identifier = rows.first().map_or(key.as_str(), |r| r.identifier.as_str());
            (identifier, rows.as_slice())
        })
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of rule rows across all identifiers.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Rule-table rows left out because of malformed expressions.
    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }
}

/// Builder for [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    identifier_column: String,
    identifier_match: IdentifierMatch,
    ignored_columns: Vec<String>,
}

impl RuleSetBuilder {
    pub fn new(identifier_column: impl Into<String>) -> Self {
        Self {
            identifier_column: identifier_column.into(),
            identifier_match: IdentifierMatch::default(),
            ignored_columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn identifier_match(mut self, identifier_match: IdentifierMatch) -> Self {
        self.identifier_match = identifier_match;
        self
    }

    /// Exclude a rule-table column from the constraints (e.g. a notes column).
    #[must_use]
    pub fn ignore_column(mut self, column: impl Into<String>) -> Self {
        self.ignored_columns.push(column.into());
        self
    }

    #[must_use]
    pub fn ignore_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Read a rule table from `source` and build from it.
    pub fn load(&self, source: &mut impl TabularSource) -> Result<RuleSet, RuleError> {
        let table = source.read_table()?;
        self.build(&table)
    }

    /// Build a rule set from `table`.
    ///
    /// Fails only when the identifier column is missing. Rows with a blank
    /// identifier are dropped; rows with a malformed expression are recorded
    /// in [`RuleSet::skipped`].
    #[instrument(skip_all, fields(identifier_column = %self.identifier_column, rows = table.len()))]
    pub fn build(&self, table: &Table) -> Result<RuleSet, RuleError> {
        let header = table.header();
        let id_index = header.require(&self.identifier_column)?;

        let constrained: Vec<(usize, &str)> = header
            .columns()
            .iter()
            .enumerate()
            .filter(|&(i, name)| {
                i != id_index
                    && !name.is_empty()
                    && !self.ignored_columns.iter().any(|c| eq_ignore_case(c, name))
            })
            .map(|(i, name)| (i, name.as_str()))
            .collect();

        let mut rules: BTreeMap<String, Vec<RuleRow>> = BTreeMap::new();
        let mut skipped = Vec::new();

        'records: for record in table.records() {
            let identifier = record.cell(id_index);
            if identifier.is_empty() {
                debug!(line = record.line(), "skipping rule row without identifier");
                continue;
            }

            let mut columns = Vec::with_capacity(constrained.len());
            for &(i, name) in &constrained {
                match RuleColumn::parse(name, record.cell(i)) {
                    Ok(column) => columns.push(column),
                    Err(err) => {
                        warn!(
                            line = record.line(),
                            identifier,
                            column = name,
                            error = %err,
                            "skipping malformed rule row"
                        );
                        skipped.push(SkippedRule {
                            line: record.line(),
                            identifier: identifier.to_owned(),
                            column: name.to_owned(),
                            raw: record.cell(i).to_owned(),
                            reason: err.to_string(),
                        });
                        continue 'records;
                    }
                }
            }

            rules
                .entry(self.identifier_match.key(identifier))
                .or_default()
                .push(RuleRow {
                    identifier: identifier.to_owned(),
                    line: record.line(),
                    columns,
                });
        }

        let rule_set = RuleSet {
            identifier_column: header.columns()[id_index].clone(),
            identifier_match: self.identifier_match,
            rules,
            skipped,
        };
        info!(
            identifiers = rule_set.len(),
            rules = rule_set.rule_count(),
            skipped = rule_set.skipped.len(),
            "rule set built"
        );
        Ok(rule_set)
    }
}
