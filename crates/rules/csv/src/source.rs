use std::fs::File;
use std::io::Read;
use std::path::Path;

use rulebook_core::{Header, Table, TableError, TabularSource};
use tracing::debug;

use crate::options::CsvOptions;

/// [`TabularSource`] reading delimited text. The first record is the header.
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    /// Open the file at `path`.
    pub fn open(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TableError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot open {}: {e}", path.display()),
            ))
        })?;
        Self::from_reader(file, options)
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, options: CsvOptions) -> Result<Self, TableError> {
        let delimiter = options.delimiter_byte().ok_or_else(|| {
            TableError::Backend(format!(
                "delimiter {:?} is not a single-byte character",
                options.delimiter
            ))
        })?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(options.flexible)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Ok(Self { reader })
    }
}

impl<R: Read> TabularSource for CsvSource<R> {
    fn read_table(&mut self) -> Result<Table, TableError> {
        let header = Header::new(self.reader.headers().map_err(csv_error)?.iter());
        if header.is_empty() {
            return Err(TableError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in self.reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        debug!(columns = header.len(), rows = rows.len(), "csv table read");
        Ok(Table::new(header, rows))
    }
}

pub(crate) fn csv_error(err: csv::Error) -> TableError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return TableError::Io(io);
        }
        return TableError::Backend("csv I/O error".to_owned());
    }
    TableError::Backend(err.to_string())
}
