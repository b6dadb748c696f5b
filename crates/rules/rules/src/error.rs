use rulebook_core::TableError;
use thiserror::Error;

/// Errors that can occur while building a rule set or validating rows.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A required column is absent, or the engine was wired up inconsistently.
    ///
    /// Aborts the whole run.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A rule expression is syntactically malformed.
    ///
    /// Aborts only the rule row carrying the expression.
    #[error("format error: {0}")]
    Format(String),

    /// A failure reading from a source or writing to a sink.
    #[error("table error: {0}")]
    Table(TableError),
}

impl RuleError {
    /// Returns `true` if this error must abort the whole run.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<TableError> for RuleError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::ColumnNotFound { column } => {
                Self::Configuration(format!("column not found: {column}"))
            }
            TableError::MissingHeader => Self::Configuration("missing header row".to_owned()),
            other => Self::Table(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = RuleError::Configuration("column not found: BIILING_CODE".into());
        assert_eq!(
            err.to_string(),
            "configuration error: column not found: BIILING_CODE"
        );

        let err = RuleError::Format("missing `)` in `<>(a,b`".into());
        assert_eq!(err.to_string(), "format error: missing `)` in `<>(a,b`");

        let err = RuleError::Table(TableError::Backend("bad quote".into()));
        assert_eq!(err.to_string(), "table error: backend error: bad quote");
    }

    #[test]
    fn missing_column_becomes_configuration_error() {
        let err: RuleError = TableError::column_not_found("Currency").into();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "configuration error: column not found: Currency"
        );
    }

    #[test]
    fn backend_failures_stay_table_errors() {
        let err: RuleError = TableError::Sink("closed".into()).into();
        assert!(matches!(err, RuleError::Table(TableError::Sink(_))));
        assert!(!err.is_configuration());
    }
}
