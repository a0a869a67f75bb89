//! Header-driven CSV reading.
//!
//! Columns are looked up by name in the header row, so the physical column
//! order of a table never matters.

use crate::error::{Result, WalsError};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// A CSV table with a fixed set of named columns resolved against its header.
pub(crate) struct Table<R> {
    source: PathBuf,
    reader: csv::Reader<R>,
    columns: Vec<usize>,
}

impl Table<File> {
    /// Open `path` and resolve `columns` against its header.
    pub(crate) fn open(path: &Path, columns: &[&'static str]) -> Result<Self> {
        let file = File::open(path).map_err(|source| WalsError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path, columns)
    }
}

impl<R: io::Read> Table<R> {
    /// Wrap an arbitrary reader. `source` is only used in error messages.
    pub(crate) fn from_reader(
        reader: R,
        source: impl Into<PathBuf>,
        columns: &[&'static str],
    ) -> Result<Self> {
        let source = source.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| WalsError::Csv {
                path: source.clone(),
                source: e,
            })?
            .clone();

        let columns = columns
            .iter()
            .map(|&column| {
                headers
                    .iter()
                    .position(|h| h.trim() == column)
                    .ok_or_else(|| WalsError::MissingColumn {
                        path: source.clone(),
                        column,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source,
            reader,
            columns,
        })
    }

    /// Visit every data row in file order. Stops at the first error, including
    /// a row with a different number of fields than the header.
    pub(crate) fn for_each_row<F>(mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(Row<'_>) -> Result<()>,
    {
        let mut record = csv::StringRecord::new();
        loop {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|e| WalsError::Csv {
                    path: self.source.clone(),
                    source: e,
                })?;
            if !more {
                return Ok(());
            }
            let line = record.position().map_or(0, |p| p.line());
            visit(Row {
                record: &record,
                columns: &self.columns,
                source: &self.source,
                line,
            })?;
        }
    }
}

/// One data row, exposing the resolved columns by their request index.
pub(crate) struct Row<'a> {
    record: &'a csv::StringRecord,
    columns: &'a [usize],
    source: &'a Path,
    line: u64,
}

impl<'a> Row<'a> {
    /// Field for the `i`-th requested column. Rows whose field count differs
    /// from the header never get here: the reader fails them with `Csv`.
    pub(crate) fn get(&self, i: usize) -> &'a str {
        self.columns
            .get(i)
            .and_then(|&c| self.record.get(c))
            .unwrap_or("")
    }

    /// 1-based line number of this row in the source file.
    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> WalsError {
        WalsError::MalformedInput {
            path: self.source.to_path_buf(),
            line: self.line,
            reason: reason.into(),
        }
    }
}
