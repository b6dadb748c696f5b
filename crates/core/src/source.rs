use crate::error::TableError;
use crate::table::Table;

/// A producer of tabular data: a header row followed by data rows.
///
/// The header row defines the column vocabulary used to address cells.
pub trait TabularSource {
    /// Read the whole table.
    fn read_table(&mut self) -> Result<Table, TableError>;
}

/// A consumer of tabular data. Rows are staged and made durable on
/// [`commit`](Self::commit).
pub trait TabularSink {
    /// Write the header row. Must be called exactly once, before any row.
    fn write_header(&mut self, columns: &[String]) -> Result<(), TableError>;

    /// Write a data row.
    fn write_row(&mut self, cells: &[String]) -> Result<(), TableError>;

    /// Flush staged rows to durable storage.
    fn commit(&mut self) -> Result<(), TableError>;
}

impl<S: TabularSink + ?Sized> TabularSink for &mut S {
    fn write_header(&mut self, columns: &[String]) -> Result<(), TableError> {
        (**self).write_header(columns)
    }

    fn write_row(&mut self, cells: &[String]) -> Result<(), TableError> {
        (**self).write_row(cells)
    }

    fn commit(&mut self) -> Result<(), TableError> {
        (**self).commit()
    }
}

impl<S: TabularSource + ?Sized> TabularSource for &mut S {
    fn read_table(&mut self) -> Result<Table, TableError> {
        (**self).read_table()
    }
}
