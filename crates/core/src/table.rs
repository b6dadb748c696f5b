use std::sync::Arc;

use tracing::debug;

use crate::error::TableError;
use crate::header::Header;

/// A single data row bound to the header it was read under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Arc<Header>,
    cells: Vec<String>,
    line: usize,
}

impl Record {
    /// The header this record is addressed by.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Raw cells in column order. Always at least as long as the header.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// 1-based line in the source table (the header is line 1).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Cell at `index`, or `""` past the end of the row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }

    /// Value of the named column.
    ///
    /// Missing columns and blank cells both read as the empty string.
    pub fn get(&self, column: &str) -> &str {
        self.header.position(column).map_or("", |i| self.cell(i))
    }

    /// Value of the named column, failing if the header lacks it.
    pub fn require(&self, column: &str) -> Result<&str, TableError> {
        self.header.require(column).map(|i| self.cell(i))
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), self.cell(i)))
    }

    /// Returns `true` if every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// An in-memory table: a header plus the records read under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Arc<Header>,
    records: Vec<Record>,
}

impl Table {
    /// Build a table from a header and raw rows.
    ///
    /// Cells are trimmed. Short rows are padded with empty cells so that every
    /// header column is addressable.
    pub fn new(header: Header, rows: Vec<Vec<String>>) -> Self {
        let header = Arc::new(header);
        let width = header.len();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut cells)| {
                for cell in &mut cells {
                    let trimmed = cell.trim();
                    if trimmed.len() != cell.len() {
                        *cell = trimmed.to_owned();
                    }
                }
                if cells.len() < width {
                    debug!(line = i + 2, cells = cells.len(), width, "padding short row");
                    cells.resize(width, String::new());
                }
                Record {
                    header: Arc::clone(&header),
                    cells,
                    line: i + 2,
                }
            })
            .collect();
        Self { header, records }
    }

    /// Convenience constructor from string slices.
    pub fn from_rows(header: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            Header::new(header),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
        )
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            &["Code", "Currency", "Status"],
            &[&["B1", " USD ", "open"], &["B2", "EUR"]],
        )
    }

    #[test]
    fn records_carry_line_numbers() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].line(), 2);
        assert_eq!(table.records()[1].line(), 3);
    }

    #[test]
    fn cells_are_trimmed_and_short_rows_padded() {
        let table = sample();
        let first = &table.records()[0];
        assert_eq!(first.get("currency"), "USD");
        let second = &table.records()[1];
        assert_eq!(second.cells().len(), 3);
        assert_eq!(second.get("Status"), "");
    }

    #[test]
    fn missing_column_reads_empty_but_require_fails() {
        let table = sample();
        let record = &table.records()[0];
        assert_eq!(record.get("nope"), "");
        assert!(record.require("nope").is_err());
        assert_eq!(record.require("CODE").unwrap(), "B1");
    }

    #[test]
    fn iter_pairs_columns_with_values() {
        let table = sample();
        let pairs: Vec<(&str, &str)> = table.records()[1].iter().collect();
        assert_eq!(pairs, vec![("Code", "B2"), ("Currency", "EUR"), ("Status", "")]);
    }

    #[test]
    fn blank_record_detection() {
        let table = Table::from_rows(&["a", "b"], &[&["", "  "], &["x", ""]]);
        assert!(table.records()[0].is_blank());
        assert!(!table.records()[1].is_blank());
    }
}
