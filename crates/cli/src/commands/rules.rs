use std::path::PathBuf;

use clap::Args;
use rulebook_rules::{CandidateRow, RuleEngine, RuleSet, ValidationTrace};

use crate::OutputFormat;
use crate::config::RulebookConfig;

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Rule book CSV.
    #[arg(long)]
    pub rules: PathBuf,
    /// Trace how a candidate with this identifier is validated instead of
    /// listing the rule book.
    #[arg(long)]
    pub explain: Option<String>,
    /// Candidate cells for `--explain` (column=value, repeatable).
    #[arg(long, value_parser = parse_key_val, requires = "explain")]
    pub value: Vec<(String, String)>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid COLUMN=VALUE: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

pub fn run(
    config: &RulebookConfig,
    args: &RulesArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let rule_set = super::load_rule_set(config, &args.rules)?;

    let Some(identifier) = &args.explain else {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rule_set)?),
            OutputFormat::Text => print!("{}", render_rule_set(&rule_set)),
        }
        return Ok(());
    };

    let candidate = args
        .value
        .iter()
        .fold(CandidateRow::new(identifier.as_str()), |row, (column, value)| {
            row.with_value(column.as_str(), value.as_str())
        });
    let engine = RuleEngine::with_options(rule_set, config.engine.options());
    let trace = engine.validate_traced(&candidate);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trace)?),
        OutputFormat::Text => print!("{}", render_trace(&trace)),
    }
    Ok(())
}

fn render_rule_set(rule_set: &RuleSet) -> String {
    let mut out = format!(
        "{} rule rows for {} identifiers (column {}):\n",
        rule_set.rule_count(),
        rule_set.len(),
        rule_set.identifier_column(),
    );
    for (identifier, rows) in rule_set.iter() {
        out.push_str(&format!("  {identifier}\n"));
        for row in rows {
            let constraints: Vec<String> = row
                .columns
                .iter()
                .filter(|c| !c.expression.is_wildcard())
                .map(|c| format!("{}={}", c.name, c.expression))
                .collect();
            let constraints = if constraints.is_empty() {
                "(unconstrained)".to_owned()
            } else {
                constraints.join("; ")
            };
            out.push_str(&format!("    line {}: {constraints}\n", row.line));
        }
    }

    let skipped = rule_set.skipped();
    if !skipped.is_empty() {
        out.push_str(&format!("{} rule rows skipped:\n", skipped.len()));
        for skip in skipped {
            out.push_str(&format!(
                "  line {line} ({identifier}) column {column} `{raw}`: {reason}\n",
                line = skip.line,
                identifier = skip.identifier,
                column = skip.column,
                raw = skip.raw,
                reason = skip.reason,
            ));
        }
    }
    out
}

fn render_trace(trace: &ValidationTrace) -> String {
    let mut out = format!(
        "{}: {} ({} evaluated, {} skipped)\n",
        trace.identifier,
        trace.verdict.label(),
        trace.total_rules_evaluated,
        trace.total_rules_skipped,
    );
    if trace.trace.is_empty() {
        out.push_str("  identifier not in rule book\n");
    }
    for entry in &trace.trace {
        out.push_str(&format!("  line {}: {}", entry.line, entry.result.as_str()));
        if let (Some(column), Some(expected), Some(actual)) =
            (&entry.failed_column, &entry.expected, &entry.actual)
        {
            out.push_str(&format!(" at {column} (expected `{expected}`, got `{actual}`)"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use rulebook_core::Table;

    use super::*;

    fn rule_set() -> RuleSet {
        let table = Table::from_rows(
            &["BIILING_CODE", "Currency", "Status"],
            &[
                &["B1", "USD", "Not Used"],
                &["B1", "<>(USD)", "open"],
                &["B2", "<>(USD", "open"],
            ],
        );
        RuleSet::build(&table, "BIILING_CODE").unwrap()
    }

    #[test]
    fn key_val_parsing() {
        assert_eq!(
            parse_key_val("Currency=G,H").unwrap(),
            ("Currency".to_owned(), "G,H".to_owned())
        );
        assert_eq!(parse_key_val("Status=").unwrap().1, "");
        assert!(parse_key_val("Currency").is_err());
    }

    #[test]
    fn renders_rules_and_skipped_rows() {
        let text = render_rule_set(&rule_set());
        assert!(text.starts_with("2 rule rows for 1 identifiers (column BIILING_CODE):\n"));
        assert!(text.contains("    line 2: Currency=USD\n"));
        assert!(text.contains("    line 3: Currency=<>(USD); Status=open\n"));
        assert!(text.contains("1 rule rows skipped:\n"));
        assert!(text.contains("  line 4 (B2) column Currency `<>(USD`"));
    }

    #[test]
    fn renders_trace() {
        let engine = RuleEngine::new(rule_set());
        let candidate = CandidateRow::new("B1")
            .with_value("Currency", "EUR")
            .with_value("Status", "closed");
        let text = render_trace(&engine.validate_traced(&candidate));
        assert_eq!(
            text,
            "B1: Wrong (2 evaluated, 0 skipped)\n\
             \x20 line 2: not_matched at Currency (expected `USD`, got `EUR`)\n\
             \x20 line 3: not_matched at Status (expected `open`, got `closed`)\n"
        );
    }

    #[test]
    fn renders_unknown_identifier() {
        let engine = RuleEngine::new(rule_set());
        let text = render_trace(&engine.validate_traced(&CandidateRow::new("ZZ")));
        assert_eq!(text, "ZZ: Wrong (0 evaluated, 0 skipped)\n  identifier not in rule book\n");
    }
}
