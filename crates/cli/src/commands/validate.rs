use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rulebook_core::TabularSource;
use rulebook_rules::{
    AnnotateOptions, CandidateCells, EngineOptions, NoMatchPolicy, RuleEngine, ValidationSummary,
    annotate,
};
use rulebook_rules_csv::{CsvSink, CsvSource};
use tracing::info;

use crate::OutputFormat;
use crate::config::RulebookConfig;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Rule book CSV.
    #[arg(long)]
    pub rules: PathBuf,
    /// Data CSV to validate.
    #[arg(long)]
    pub input: PathBuf,
    /// Annotated output CSV. Written to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Append a column naming the first rejecting column.
    #[arg(long)]
    pub mismatch_column: Option<String>,
    /// Do not write rule rows under each candidate.
    #[arg(long)]
    pub no_rule_rows: bool,
    /// Split candidate cells on commas and require every token to match.
    #[arg(long)]
    pub multi_value: bool,
    /// Carry no rule row on verdicts that match nothing.
    #[arg(long)]
    pub discard_unmatched: bool,
}

impl ValidateArgs {
    fn engine_options(&self, config: &RulebookConfig) -> EngineOptions {
        let mut options = config.engine.options();
        if self.multi_value {
            options.candidate_cells = CandidateCells::MultiValue;
        }
        if self.discard_unmatched {
            options.no_match = NoMatchPolicy::Discard;
        }
        options
    }

    fn annotate_options(&self, config: &RulebookConfig) -> AnnotateOptions {
        let mut options = config.output.clone();
        if let Some(column) = &self.mismatch_column {
            options.mismatch_column = Some(column.clone());
        }
        if self.no_rule_rows {
            options.emit_rule_rows = false;
        }
        options
    }
}

pub fn run(
    config: &RulebookConfig,
    args: &ValidateArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let rule_set = super::load_rule_set(config, &args.rules)?;
    let engine = RuleEngine::with_options(rule_set, args.engine_options(config));

    let table = CsvSource::open(&args.input, config.csv)?
        .read_table()
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let options = args.annotate_options(config);

    let summary = match &args.output {
        Some(path) => {
            let mut sink = CsvSink::create(path, config.csv)?;
            let summary = annotate(&engine, &table, &mut sink, &options)?;
            info!(path = %path.display(), "annotated table written");
            summary
        }
        None => {
            let mut sink = CsvSink::new(std::io::stdout().lock(), config.csv)?;
            annotate(&engine, &table, &mut sink, &options)?
        }
    };

    // Without an output path the table owns stdout.
    if args.output.is_some() {
        print_summary(&mut std::io::stdout().lock(), &summary, format)?;
    } else {
        print_summary(&mut std::io::stderr().lock(), &summary, format)?;
    }
    Ok(())
}

fn print_summary(
    out: &mut impl std::io::Write,
    summary: &ValidationSummary,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "{total} rows validated: {matched} correct, {wrong} wrong ({unknown} unknown identifier)",
                total = summary.total,
                matched = summary.matched,
                wrong = summary.mismatched + summary.unknown_identifier,
                unknown = summary.unknown_identifier,
            )?;
            if summary.skipped_rules > 0 {
                writeln!(
                    out,
                    "{} rule rows skipped; run `rulebook rules` for details",
                    summary.skipped_rules
                )?;
            }
        }
    }
    Ok(())
}
