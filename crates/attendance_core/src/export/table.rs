//! Format-neutral tabular data handed to export writers.

use super::{ExportError, ExportResult};
use crate::model::attendance::AttendanceDate;

/// Declared type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Date,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// One typed value. `Empty` stands for an absent optional value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Integer(i64),
    Float(f64),
    Text(String),
    Date(AttendanceDate),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, Self::text)
    }

    pub fn optional_float(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Float)
    }

    fn matches(&self, kind: ColumnType) -> bool {
        matches!(
            (self, kind),
            (Self::Empty, _)
                | (Self::Integer(_), ColumnType::Integer)
                | (Self::Float(_), ColumnType::Float)
                | (Self::Text(_), ColumnType::Text)
                | (Self::Date(_), ColumnType::Date)
        )
    }
}

/// Named table with ordered columns and ordered rows.
///
/// Every row has exactly one cell per column, and every non-empty cell
/// matches its column type.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends one row after checking its width and cell types.
    pub fn push_row(&mut self, row: Vec<Cell>) -> ExportResult<()> {
        if row.len() != self.columns.len() {
            return Err(ExportError::RowShape {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        if let Some((column, _)) = self
            .columns
            .iter()
            .zip(&row)
            .find(|(column, cell)| !cell.matches(column.kind))
        {
            return Err(ExportError::CellType {
                row: self.rows.len(),
                column: column.name.clone(),
                expected: column.kind,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}
