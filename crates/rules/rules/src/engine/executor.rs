use rulebook_core::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::engine::candidate::{CandidateRow, CellLookup};
use crate::engine::eval::{CandidateCells, first_mismatch};
use crate::engine::trace::{RuleTraceEntry, RuleTraceResult, ValidationTrace};
use crate::engine::verdict::Verdict;
use crate::error::RuleError;
use crate::ruleset::RuleSet;

/// What a verdict carries when no rule row accepts the candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Report no rule.
    Discard,
    /// Report the last rule row compared and the column it rejected.
    #[default]
    LastCompared,
}

/// Engine-wide evaluation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub no_match: NoMatchPolicy,
    pub candidate_cells: CandidateCells,
}

/// Validates candidate rows against a rule set.
///
/// Rule rows sharing the candidate's identifier are tried in table order and
/// the first one whose columns all accept the candidate wins.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rule_set: RuleSet,
    options: EngineOptions,
}

impl RuleEngine {
    /// Create an engine with default options.
    pub fn new(rule_set: RuleSet) -> Self {
        Self::with_options(rule_set, EngineOptions::default())
    }

    pub fn with_options(rule_set: RuleSet, options: EngineOptions) -> Self {
        Self { rule_set, options }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Validate a candidate row.
    #[instrument(level = "debug", skip_all, fields(identifier = %candidate.identifier()))]
    pub fn validate(&self, candidate: &CandidateRow) -> Verdict {
        self.validate_cells(candidate.identifier(), candidate)
    }

    /// Validate a table record, reading its identifier from the rule set's
    /// identifier column.
    pub fn validate_record(&self, record: &Record) -> Result<Verdict, RuleError> {
        let identifier = record.require(self.rule_set.identifier_column())?;
        Ok(self.validate_cells(identifier, record))
    }

    /// Validate `cells` as a candidate carrying `identifier`.
    pub fn validate_cells<C: CellLookup + ?Sized>(&self, identifier: &str, cells: &C) -> Verdict {
        let Some(rules) = self.rule_set.rules_for(identifier) else {
            debug!(identifier, "identifier not in rule book");
            return Verdict::no_match();
        };

        let mut last_mismatch = None;
        for rule in rules {
            match first_mismatch(rule, cells, self.options.candidate_cells) {
                None => {
                    debug!(identifier, line = rule.line, "rule matched");
                    return Verdict::matched(rule.clone());
                }
                Some(column) => last_mismatch = Some((rule, column)),
            }
        }

        debug!(identifier, rules = rules.len(), "no rule matched");
        match (self.options.no_match, last_mismatch) {
            (NoMatchPolicy::LastCompared, Some((rule, column))) => {
                Verdict::mismatched(rule.clone(), column.name.clone())
            }
            _ => Verdict::no_match(),
        }
    }

    /// Validate a candidate and record how every rule row fared.
    pub fn validate_traced(&self, candidate: &CandidateRow) -> ValidationTrace {
        let verdict = self.validate(candidate);
        let rules = self
            .rule_set
            .rules_for(candidate.identifier())
            .unwrap_or_default();

        let mut trace = Vec::with_capacity(rules.len());
        let mut matched = false;
        for rule in rules {
            if matched {
                trace.push(RuleTraceEntry {
                    line: rule.line,
                    result: RuleTraceResult::Skipped,
                    failed_column: None,
                    expected: None,
                    actual: None,
                });
                continue;
            }
            match first_mismatch(rule, candidate, self.options.candidate_cells) {
                None => {
                    matched = true;
                    trace.push(RuleTraceEntry {
                        line: rule.line,
                        result: RuleTraceResult::Matched,
                        failed_column: None,
                        expected: None,
                        actual: None,
                    });
                }
                Some(column) => trace.push(RuleTraceEntry {
                    line: rule.line,
                    result: RuleTraceResult::NotMatched,
                    failed_column: Some(column.name.clone()),
                    expected: Some(column.raw.clone()),
                    actual: Some(candidate.value(&column.name).to_owned()),
                }),
            }
        }

        let total_rules_skipped = trace
            .iter()
            .filter(|e| e.result == RuleTraceResult::Skipped)
            .count();
        ValidationTrace {
            identifier: candidate.identifier().to_owned(),
            verdict,
            total_rules_evaluated: trace.len() - total_rules_skipped,
            total_rules_skipped,
            trace,
        }
    }
}
