use crate::error::TableError;
use crate::header::Header;
use crate::source::{TabularSink, TabularSource};
use crate::table::Table;

/// In-memory [`TabularSource`] that hands out a clone of a prepared table.
#[derive(Debug, Clone)]
pub struct MemorySource {
    table: Table,
}

impl MemorySource {
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

impl TabularSource for MemorySource {
    fn read_table(&mut self) -> Result<Table, TableError> {
        Ok(self.table.clone())
    }
}

/// In-memory [`TabularSink`] that records everything written to it.
#[derive(Debug, Default)]
pub struct MemorySink {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    commits: usize,
}

impl MemorySink {
    /// Create a new, empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The header row, if one was written.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Data rows in write order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of times [`commit`](TabularSink::commit) was called.
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Convert the written output back into a [`Table`].
    pub fn into_table(self) -> Result<Table, TableError> {
        let header = self.header.ok_or(TableError::MissingHeader)?;
        Ok(Table::new(Header::new(header), self.rows))
    }
}

impl TabularSink for MemorySink {
    fn write_header(&mut self, columns: &[String]) -> Result<(), TableError> {
        if self.header.is_some() {
            return Err(TableError::Sink("header already written".into()));
        }
        self.header = Some(columns.to_vec());
        Ok(())
    }

    fn write_row(&mut self, cells: &[String]) -> Result<(), TableError> {
        if self.header.is_none() {
            return Err(TableError::Sink("row written before header".into()));
        }
        self.rows.push(cells.to_vec());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), TableError> {
        self.commits += 1;
        Ok(())
    }
}
