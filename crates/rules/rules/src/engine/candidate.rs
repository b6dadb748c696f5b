use rulebook_core::Record;
use rulebook_core::text::eq_ignore_case;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Read access to a row's cells by column name.
///
/// Implementations return `""` for missing columns and blank cells alike.
pub trait CellLookup {
    fn lookup(&self, column: &str) -> &str;
}

impl CellLookup for Record {
    fn lookup(&self, column: &str) -> &str {
        self.get(column)
    }
}

/// A data row to be checked against the rule book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRow {
    identifier: String,
    values: Vec<(String, String)>,
}

impl CandidateRow {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            values: Vec::new(),
        }
    }

    /// Set the value of `column`. Later values for the same column win.
    #[must_use]
    pub fn with_value(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| eq_ignore_case(c, &column)) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column, value)),
        }
        self
    }

    /// Build a candidate from a table record, reading the identifier from
    /// `identifier_column`.
    pub fn from_record(record: &Record, identifier_column: &str) -> Result<Self, RuleError> {
        let identifier = record.require(identifier_column)?;
        Ok(Self {
            identifier: identifier.to_owned(),
            values: record
                .iter()
                .map(|(c, v)| (c.to_owned(), v.to_owned()))
                .collect(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Value of `column`, or `""` if absent.
    pub fn value(&self, column: &str) -> &str {
        self.values
            .iter()
            .find(|(c, _)| eq_ignore_case(c, column))
            .map_or("", |(_, v)| v.as_str())
    }
}

impl CellLookup for CandidateRow {
    fn lookup(&self, column: &str) -> &str {
        self.value(column)
    }
}

#[cfg(test)]
mod tests {
    use rulebook_core::Table;

    use super::*;

    #[test]
    fn values_are_looked_up_case_insensitively() {
        let row = CandidateRow::new("B1")
            .with_value("Currency", "USD")
            .with_value("currency", "EUR");
        assert_eq!(row.identifier(), "B1");
        assert_eq!(row.value("CURRENCY"), "EUR");
        assert_eq!(row.value("Status"), "");
    }

    #[test]
    fn from_record_copies_cells() {
        let table = Table::from_rows(&["Code", "Currency"], &[&["B1", "USD"]]);
        let row = CandidateRow::from_record(&table.records()[0], "code").unwrap();
        assert_eq!(row.identifier(), "B1");
        assert_eq!(row.lookup("Currency"), "USD");
    }

    #[test]
    fn from_record_requires_identifier_column() {
        let table = Table::from_rows(&["Currency"], &[&["USD"]]);
        let err = CandidateRow::from_record(&table.records()[0], "Code").unwrap_err();
        assert!(err.is_configuration());
    }
}
