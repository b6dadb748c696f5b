use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rulebook_core::{TableError, TabularSink};
use tracing::debug;

use crate::options::CsvOptions;
use crate::source::csv_error;

/// A file that is created on first write.
///
/// Lets a sink be set up before a run without leaving an empty file behind
/// when the run aborts.
#[derive(Debug)]
pub struct DeferredFile {
    path: PathBuf,
    file: Option<File>,
}

impl DeferredFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(&self.path)?,
        };
        Ok(self.file.insert(file))
    }
}

impl Write for DeferredFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// [`TabularSink`] writing delimited text.
///
/// Rows are staged in memory and only reach the target on
/// [`commit`](TabularSink::commit).
pub struct CsvSink<W: Write> {
    staged: csv::Writer<Vec<u8>>,
    delimiter: u8,
    flexible: bool,
    target: W,
    header_written: bool,
    rows: usize,
}

impl CsvSink<DeferredFile> {
    /// A sink that creates `path` on commit.
    pub fn create(path: impl Into<PathBuf>, options: CsvOptions) -> Result<Self, TableError> {
        Self::new(DeferredFile::new(path), options)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(target: W, options: CsvOptions) -> Result<Self, TableError> {
        let delimiter = options.delimiter_byte().ok_or_else(|| {
            TableError::Backend(format!(
                "delimiter {:?} is not a single-byte character",
                options.delimiter
            ))
        })?;
        Ok(Self {
            staged: staging_writer(delimiter, options.flexible),
            delimiter,
            flexible: options.flexible,
            target,
            header_written: false,
            rows: 0,
        })
    }

    /// Consume the sink and return the target.
    pub fn into_inner(self) -> W {
        self.target
    }
}

impl<W: Write> TabularSink for CsvSink<W> {
    fn write_header(&mut self, columns: &[String]) -> Result<(), TableError> {
        if self.header_written {
            return Err(TableError::Sink("header already written".into()));
        }
        self.staged.write_record(columns).map_err(csv_error)?;
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, cells: &[String]) -> Result<(), TableError> {
        if !self.header_written {
            return Err(TableError::Sink("row written before header".into()));
        }
        self.staged.write_record(cells).map_err(csv_error)?;
        self.rows += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), TableError> {
        let staged = std::mem::replace(
            &mut self.staged,
            staging_writer(self.delimiter, self.flexible),
        );
        let buffer = staged.into_inner().map_err(|e| TableError::Io(e.into_error()))?;
        self.target.write_all(&buffer)?;
        self.target.flush()?;
        debug!(rows = self.rows, bytes = buffer.len(), "csv sink committed");
        Ok(())
    }
}

fn staging_writer(delimiter: u8, flexible: bool) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(flexible)
        .from_writer(Vec::new())
}
