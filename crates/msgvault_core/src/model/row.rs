//! Generic tabular row access used by hydration.
//!
//! # Responsibility
//! - Abstract over storage result rows (name/index introspection, typed reads).
//! - Provide `MemoryRow`, an in-memory row for fixtures and imports.
//!
//! # Invariants
//! - SQL `NULL` reads as `Ok(None)` for both integer and text getters.
//! - Reading a value of the wrong storage type is an error, not a coercion.

use crate::model::record::SqlType;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RowResult<T> = Result<T, RowError>;

#[derive(Debug)]
pub enum RowError {
    IndexOutOfRange { index: usize, count: usize },
    TypeMismatch { column: String, expected: SqlType },
    Sqlite(rusqlite::Error),
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "column index {index} out of range for row with {count} columns")
            }
            Self::TypeMismatch { column, expected } => write!(
                f,
                "column `{column}` does not hold a {} value",
                expected.as_sql()
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::IndexOutOfRange { .. } | Self::TypeMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for RowError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Positional row with named columns.
pub trait RowAccessor {
    fn column_count(&self) -> usize;
    fn column_name(&self, index: usize) -> RowResult<&str>;
    fn get_int(&self, index: usize) -> RowResult<Option<i64>>;
    fn get_string(&self, index: usize) -> RowResult<Option<String>>;
}

/// One cell of a `MemoryRow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue {
    Null,
    Integer(i64),
    Text(String),
}

impl From<i64> for RowValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Owned row of `(column name, value)` pairs in caller-chosen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRow {
    cells: Vec<(String, RowValue)>,
}

impl MemoryRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one column and returns the row, for builder-style fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RowValue>) {
        self.cells.push((name.into(), value.into()));
    }

    fn cell(&self, index: usize) -> RowResult<&(String, RowValue)> {
        self.cells.get(index).ok_or(RowError::IndexOutOfRange {
            index,
            count: self.cells.len(),
        })
    }
}

impl RowAccessor for MemoryRow {
    fn column_count(&self) -> usize {
        self.cells.len()
    }

    fn column_name(&self, index: usize) -> RowResult<&str> {
        Ok(self.cell(index)?.0.as_str())
    }

    fn get_int(&self, index: usize) -> RowResult<Option<i64>> {
        match self.cell(index)? {
            (_, RowValue::Null) => Ok(None),
            (_, RowValue::Integer(value)) => Ok(Some(*value)),
            (name, RowValue::Text(_)) => Err(RowError::TypeMismatch {
                column: name.clone(),
                expected: SqlType::Integer,
            }),
        }
    }

    fn get_string(&self, index: usize) -> RowResult<Option<String>> {
        match self.cell(index)? {
            (_, RowValue::Null) => Ok(None),
            (_, RowValue::Text(value)) => Ok(Some(value.clone())),
            (name, RowValue::Integer(_)) => Err(RowError::TypeMismatch {
                column: name.clone(),
                expected: SqlType::Text,
            }),
        }
    }
}
