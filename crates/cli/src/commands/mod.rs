pub mod count;
pub mod rules;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use rulebook_rules::{RuleSet, RuleSetBuilder};
use rulebook_rules_csv::CsvSource;

use crate::config::RulebookConfig;

/// Load the rule book at `path` with the configured identifier column,
/// ignored columns and identifier matching.
pub fn load_rule_set(config: &RulebookConfig, path: &Path) -> anyhow::Result<RuleSet> {
    let mut source = CsvSource::open(path, config.csv)?;
    RuleSetBuilder::new(&config.columns.identifier)
        .identifier_match(config.engine.identifier_match)
        .ignore_columns(&config.columns.ignored)
        .load(&mut source)
        .with_context(|| format!("failed to load rule book {}", path.display()))
}
