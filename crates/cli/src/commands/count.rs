use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rulebook_core::{TabularSource, Tally, TallyEntry};
use rulebook_rules_csv::{CsvSink, CsvSource};
use serde::Serialize;

use crate::OutputFormat;
use crate::config::RulebookConfig;

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Data CSV to tally.
    #[arg(long)]
    pub input: PathBuf,
    /// Columns whose value combinations are counted (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    pub columns: Vec<String>,
    /// Also count the values of this column within each combination.
    #[arg(long)]
    pub breakdown: Option<String>,
    /// Output CSV. The tally goes to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CountRow<'a> {
    values: BTreeMap<&'a str, &'a str>,
    #[serde(flatten)]
    entry: &'a TallyEntry,
}

pub fn run(
    config: &RulebookConfig,
    args: &CountArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let columns: Vec<&str> = args
        .columns
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    anyhow::ensure!(!columns.is_empty(), "no columns to count");

    let table = CsvSource::open(&args.input, config.csv)?
        .read_table()
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let tally = Tally::count_by(&table, &columns, args.breakdown.as_deref())?;

    match (&args.output, format) {
        (Some(path), _) => {
            let mut sink = CsvSink::create(path, config.csv)?;
            tally.write_to(&mut sink)?;
            println!(
                "{} combinations over {} rows written to {}",
                tally.len(),
                tally.total(),
                path.display()
            );
        }
        (None, OutputFormat::Text) => {
            let mut sink = CsvSink::new(std::io::stdout().lock(), config.csv)?;
            tally.write_to(&mut sink)?;
        }
        (None, OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&count_rows(&tally))?);
        }
    }
    Ok(())
}

fn count_rows(tally: &Tally) -> Vec<CountRow<'_>> {
    tally
        .entries()
        .map(|(key, entry)| CountRow {
            values: tally
                .columns()
                .iter()
                .map(String::as_str)
                .zip(key.iter().map(String::as_str))
                .collect(),
            entry,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rulebook_core::Table;

    use super::*;

    #[test]
    fn json_rows_name_their_columns() {
        let table = Table::from_rows(
            &["Reference", "Currency", "Status"],
            &[
                &["R1", "USD", "open"],
                &["R1", "USD", "closed"],
                &["R2", "EUR", "open"],
            ],
        );
        let tally = Tally::count_by(&table, &["reference", "currency"], Some("Status")).unwrap();
        let json = serde_json::to_value(count_rows(&tally)).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {
                    "values": {"Currency": "USD", "Reference": "R1"},
                    "count": 2,
                    "breakdown": {"closed": 1, "open": 1}
                },
                {
                    "values": {"Currency": "EUR", "Reference": "R2"},
                    "count": 1,
                    "breakdown": {"open": 1}
                }
            ])
        );
    }

    #[test]
    fn breakdown_is_omitted_when_not_requested() {
        let table = Table::from_rows(&["Reference"], &[&["R1"]]);
        let tally = Tally::count(&table, &["Reference"]).unwrap();
        let json = serde_json::to_value(count_rows(&tally)).unwrap();
        assert_eq!(json, serde_json::json!([{"values": {"Reference": "R1"}, "count": 1}]));
    }
}
