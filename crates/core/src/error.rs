use thiserror::Error;

/// Errors from reading, writing, or addressing tabular data.
#[derive(Debug, Error)]
pub enum TableError {
    /// A required column name is absent from the header row.
    #[error("configuration error: column not found: {column}")]
    ColumnNotFound {
        /// The column name that was looked up.
        column: String,
    },

    /// The source produced no header row.
    #[error("missing header row")]
    MissingHeader,

    /// The sink was driven out of order (e.g. a row before the header).
    #[error("sink error: {0}")]
    Sink(String),

    /// A backend-specific failure (malformed CSV, encoding, ...).
    #[error("backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Build a [`TableError::ColumnNotFound`] for `column`.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Returns `true` for configuration errors that must abort the whole run.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ColumnNotFound { .. } | Self::MissingHeader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = TableError::column_not_found("BIILING_CODE");
        assert_eq!(
            err.to_string(),
            "configuration error: column not found: BIILING_CODE"
        );

        let err = TableError::MissingHeader;
        assert_eq!(err.to_string(), "missing header row");

        let err = TableError::Sink("row written before header".into());
        assert_eq!(err.to_string(), "sink error: row written before header");

        let err = TableError::Backend("unequal lengths".into());
        assert_eq!(err.to_string(), "backend error: unequal lengths");
    }

    #[test]
    fn configuration_classification() {
        assert!(TableError::column_not_found("x").is_configuration());
        assert!(TableError::MissingHeader.is_configuration());
        assert!(!TableError::Backend("x".into()).is_configuration());
    }
}
