use std::path::Path;

use rulebook_rules::{
    AnnotateOptions, CandidateCells, EngineOptions, IdentifierMatch, NoMatchPolicy,
};
use rulebook_rules_csv::CsvOptions;
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulebookConfig {
    /// Which columns carry identifiers and which are commentary.
    #[serde(default)]
    pub columns: ColumnsConfig,
    /// Matching behaviour.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Layout of the annotated output.
    #[serde(default)]
    pub output: AnnotateOptions,
    /// CSV dialect for every file read or written.
    #[serde(default)]
    pub csv: CsvOptions,
}

/// Column configuration.
#[derive(Debug, Deserialize)]
pub struct ColumnsConfig {
    /// Identifier (billing code) column, present in both the rule book and
    /// the data. Defaults to `"BIILING_CODE"`, the spelling used by the
    /// existing rule books.
    #[serde(default = "default_identifier")]
    pub identifier: String,
    /// Rule-book columns that are not constraints.
    #[serde(default)]
    pub ignored: Vec<String>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            ignored: Vec::new(),
        }
    }
}

fn default_identifier() -> String {
    "BIILING_CODE".to_owned()
}

/// Engine configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `"last_compared"` (default) or `"discard"`.
    pub no_match: NoMatchPolicy,
    /// `"single"` (default) or `"multi_value"`.
    pub candidate_cells: CandidateCells,
    /// `"exact"` (default) or `"case_insensitive"`.
    pub identifier_match: IdentifierMatch,
}

impl EngineConfig {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            no_match: self.no_match,
            candidate_cells: self.candidate_cells,
        }
    }
}

impl RulebookConfig {
    /// Load from `path`, or fall back to defaults if the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse(&contents)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = RulebookConfig::parse("").unwrap();
        assert_eq!(config.columns.identifier, "BIILING_CODE");
        assert!(config.columns.ignored.is_empty());
        assert_eq!(config.engine.options(), EngineOptions::default());
        assert_eq!(config.engine.identifier_match, IdentifierMatch::Exact);
        assert_eq!(config.output, AnnotateOptions::default());
        assert_eq!(config.csv, CsvOptions::default());
    }

    #[test]
    fn full_config() {
        let config = RulebookConfig::parse(
            r#"
[columns]
identifier = "BILLING_CODE"
ignored = ["Notes"]

[engine]
no_match = "discard"
candidate_cells = "multi_value"
identifier_match = "case_insensitive"

[output]
result_column = "Result"
mismatch_column = "Failed Column"
emit_rule_rows = false

[csv]
delimiter = ";"
"#,
        )
        .unwrap();

        assert_eq!(config.columns.identifier, "BILLING_CODE");
        assert_eq!(config.columns.ignored, vec!["Notes"]);
        assert_eq!(config.engine.no_match, NoMatchPolicy::Discard);
        assert_eq!(config.engine.candidate_cells, CandidateCells::MultiValue);
        assert_eq!(config.engine.identifier_match, IdentifierMatch::CaseInsensitive);
        assert_eq!(config.output.result_column, "Result");
        assert_eq!(config.output.mismatch_column.as_deref(), Some("Failed Column"));
        assert!(!config.output.emit_rule_rows);
        assert_eq!(config.output.correct_label, "Correct");
        assert_eq!(config.csv.delimiter, ';');
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(RulebookConfig::parse("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = RulebookConfig::load(Path::new("/nonexistent/rulebook.toml")).unwrap();
        assert_eq!(config.columns.identifier, "BIILING_CODE");
    }
}
