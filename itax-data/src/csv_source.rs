//! CSV input for batch calculations.
//!
//! [`CsvRowSource`] hands raw rows to the batch engine without interpreting
//! them. The header is returned like any other row so the engine can check
//! it, and rows of any width are passed through so the engine can report the
//! offending row number.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use itax_core::calculations::{RowSource, RowSourceError};
use thiserror::Error;
use tracing::debug;

/// Errors raised while opening a batch input file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("File extension must is .csv")]
    NotCsv(PathBuf),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A [`RowSource`] reading comma-separated rows from any reader.
pub struct CsvRowSource<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl<R: Read> CsvRowSource<R> {
    pub fn new(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            record: StringRecord::new(),
        }
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<Vec<String>>, RowSourceError> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => Ok(None),
            Ok(true) => Ok(Some(self.record.iter().map(str::to_string).collect())),
            Err(err) => Err(to_row_source_error(err)),
        }
    }
}

fn to_row_source_error(err: csv::Error) -> RowSourceError {
    if err.is_io_error() {
        return RowSourceError::Io(err.to_string());
    }

    let line = err.position().map(|pos| pos.line()).unwrap_or_default();
    RowSourceError::Malformed {
        line,
        message: err.to_string(),
    }
}

/// Opens `path` as a batch input.
///
/// Only files with a `.csv` extension are accepted; the check is
/// case-sensitive.
pub fn open_csv(path: &Path) -> Result<CsvRowSource<File>, DataError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
        return Err(DataError::NotCsv(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "opened batch input");

    Ok(CsvRowSource::new(file))
}
