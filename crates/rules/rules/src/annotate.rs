use rulebook_core::{Header, Table, TabularSink};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::engine::executor::RuleEngine;
use crate::engine::verdict::Verdict;
use crate::error::RuleError;
use crate::ir::rule::RuleRow;

/// Layout of the annotated output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateOptions {
    /// Name of the appended verdict column.
    pub result_column: String,
    /// Name of an appended column holding the rejecting column, if wanted.
    pub mismatch_column: Option<String>,
    /// Write the matched (or last compared) rule row under each candidate.
    pub emit_rule_rows: bool,
    pub correct_label: String,
    pub wrong_label: String,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            result_column: "Validation Result".to_owned(),
            mismatch_column: None,
            emit_rule_rows: true,
            correct_label: "Correct".to_owned(),
            wrong_label: "Wrong".to_owned(),
        }
    }
}

/// Counts collected while annotating a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Candidate rows validated (blank rows are not counted).
    pub total: usize,
    pub matched: usize,
    /// Rows whose identifier is in the rule book but no rule row accepted.
    pub mismatched: usize,
    /// Rows whose identifier is not in the rule book.
    pub unknown_identifier: usize,
    /// Rule-table rows left out of the rule set.
    pub skipped_rules: usize,
}

/// Validate every record of `table` and write the annotated table to `sink`.
///
/// The identifier column is checked before anything is written, so a
/// configuration error leaves the sink untouched. The sink is committed once
/// after the last row.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn annotate(
    engine: &RuleEngine,
    table: &Table,
    sink: &mut impl TabularSink,
    options: &AnnotateOptions,
) -> Result<ValidationSummary, RuleError> {
    let rule_set = engine.rule_set();
    let header = table.header();
    let id_index = header.require(rule_set.identifier_column())?;

    let mut appended = vec![options.result_column.as_str()];
    if let Some(column) = &options.mismatch_column {
        appended.push(column.as_str());
    }
    sink.write_header(header.extended(appended).columns())?;

    let mut summary = ValidationSummary {
        skipped_rules: rule_set.skipped().len(),
        ..ValidationSummary::default()
    };

    for record in table.records() {
        if record.is_blank() {
            continue;
        }
        let identifier = record.cell(id_index);
        let verdict = engine.validate_cells(identifier, record);

        summary.total += 1;
        if verdict.matched {
            summary.matched += 1;
        } else if rule_set.contains(identifier) {
            summary.mismatched += 1;
        } else {
            summary.unknown_identifier += 1;
        }

        let mut row = record.cells()[..header.len()].to_vec();
        push_verdict_cells(&mut row, &verdict, options);
        sink.write_row(&row)?;

        if options.emit_rule_rows
            && let Some(rule) = &verdict.matched_rule
        {
            let mut row = rule_cells(rule, header, id_index);
            push_verdict_cells(&mut row, &verdict, options);
            sink.write_row(&row)?;
        }
    }

    sink.commit()?;
    info!(
        total = summary.total,
        matched = summary.matched,
        mismatched = summary.mismatched,
        unknown_identifier = summary.unknown_identifier,
        "annotation complete"
    );
    Ok(summary)
}

fn push_verdict_cells(row: &mut Vec<String>, verdict: &Verdict, options: &AnnotateOptions) {
    let label = if verdict.matched {
        &options.correct_label
    } else {
        &options.wrong_label
    };
    row.push(label.clone());
    if options.mismatch_column.is_some() {
        row.push(verdict.mismatched_column.clone().unwrap_or_default());
    }
}

/// Lay a rule row out under the candidate header. Rule columns the header
/// lacks are dropped.
fn rule_cells(rule: &RuleRow, header: &Header, id_index: usize) -> Vec<String> {
    let mut cells = vec![String::new(); header.len()];
    cells[id_index].clone_from(&rule.identifier);
    for column in &rule.columns {
        if let Some(i) = header.position(&column.name) {
            cells[i].clone_from(&column.raw);
        }
    }
    cells
}
