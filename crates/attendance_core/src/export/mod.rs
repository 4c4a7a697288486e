//! Table export to CSV and xlsx files.
//!
//! # Responsibility
//! - Serialize a [`Table`] to a file without reordering, deduplicating or
//!   filtering its rows.
//! - Build tables from stored rows and reports (see [`sources`]).
//!
//! # Invariants
//! - An empty table is rejected with `EmptyResult` and no file is created.
//! - Output is staged in a temporary file next to the destination and
//!   renamed into place; a failed export leaves no partial file.

mod csv_writer;
pub mod sources;
pub mod table;
mod xlsx_writer;

pub use table::{Cell, Column, ColumnType, Table};

use crate::repo::RepoError;
use log::{error, info};
use rust_xlsxwriter::XlsxError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type ExportResult<T> = Result<T, ExportError>;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Infers the format from a `.csv` or `.xlsx` extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if extension.eq_ignore_ascii_case("xlsx") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// What a successful export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub rows_written: usize,
}

#[derive(Debug)]
pub enum ExportError {
    /// The destination could not be written.
    Io { path: PathBuf, source: io::Error },
    /// The table has no rows.
    EmptyResult { table: String },
    /// A row does not have one cell per column.
    RowShape {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A cell does not match its column type.
    CellType {
        row: usize,
        column: String,
        expected: ColumnType,
    },
    Xlsx(XlsxError),
    /// Building the source table failed.
    Repo(RepoError),
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::EmptyResult { .. } => "empty_result",
            Self::RowShape { .. } | Self::CellType { .. } => "invalid_table",
            Self::Xlsx(_) => "xlsx",
            Self::Repo(err) => err.code(),
        }
    }
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot write export to `{}`: {source}", path.display())
            }
            Self::EmptyResult { table } => write!(f, "table `{table}` has no rows to export"),
            Self::RowShape {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} cells, expected {expected}"),
            Self::CellType {
                row,
                column,
                expected,
            } => write!(
                f,
                "row {row} column `{column}` is not of type {}",
                expected.as_str()
            ),
            Self::Xlsx(err) => write!(f, "xlsx rendering failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Xlsx(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::EmptyResult { .. } | Self::RowShape { .. } | Self::CellType { .. } => None,
        }
    }
}

impl From<XlsxError> for ExportError {
    fn from(value: XlsxError) -> Self {
        Self::Xlsx(value)
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Writes `table` to `path` in `format`.
pub fn export_table(table: &Table, format: ExportFormat, path: &Path) -> ExportResult<ExportReceipt> {
    let started_at = Instant::now();
    if table.is_empty() {
        info!(
            "event=export_write module=export status=skipped reason=empty_result table={} format={format}",
            table.name()
        );
        return Err(ExportError::EmptyResult {
            table: table.name().to_string(),
        });
    }

    match write_atomically(table, format, path) {
        Ok(()) => {
            info!(
                "event=export_write module=export status=ok table={} format={format} rows={} duration_ms={}",
                table.name(),
                table.rows().len(),
                started_at.elapsed().as_millis()
            );
            Ok(ExportReceipt {
                path: path.to_path_buf(),
                format,
                rows_written: table.rows().len(),
            })
        }
        Err(err) => {
            error!(
                "event=export_write module=export status=error table={} format={format} error_code={} duration_ms={}",
                table.name(),
                err.code(),
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn write_atomically(table: &Table, format: ExportFormat, path: &Path) -> ExportResult<()> {
    let io_error = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(directory).map_err(io_error)?;

    match format {
        ExportFormat::Csv => csv_writer::write_csv(table, staged.as_file_mut()).map_err(io_error)?,
        ExportFormat::Xlsx => {
            let bytes = xlsx_writer::render_xlsx(table)?;
            staged.write_all(&bytes).map_err(io_error)?;
        }
    }

    staged.as_file().sync_all().map_err(io_error)?;
    staged.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}
