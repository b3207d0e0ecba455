//! Generic statement execution against the store.
//!
//! Every statement goes through `query` or `execute` with bound parameters;
//! driver errors come back as `CricketError::Store` tagged read or write.

use super::schema::CricketDatabase;
use crate::error::{CricketError, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Statement, ToSql};
use serde::Serialize;
use std::fmt;

/// A single typed value in a result row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Real(v) => Some(*v),
            Cell::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(v) => Cell::Integer(v),
            ValueRef::Real(v) => Cell::Real(v),
            ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Cell::Text(format!("<{} bytes>", bytes.len())),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Real(v) => write!(f, "{v:.2}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Ordered rows returned by a read statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    /// Result returned when a query's tables are absent or empty
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().filter_map(|row| row.get(idx)).collect(),
            None => Vec::new(),
        }
    }
}

impl CricketDatabase {
    /// Run a read statement and collect every row
    pub fn query(&self, sql: &str, params: &[&dyn ToSql]) -> Result<ResultSet> {
        let mut stmt = self.conn.prepare(sql).map_err(CricketError::read)?;
        collect_rows(&mut stmt, params)
    }

    /// Run a write statement, returning the number of affected rows
    pub fn execute(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        self.conn.execute(sql, params).map_err(CricketError::write)
    }

    /// Prepare `sql` and run it only if SQLite reports it cannot modify the database
    pub fn query_read_only(&self, sql: &str, params: &[&dyn ToSql]) -> Result<ResultSet> {
        let mut stmt = self.conn.prepare(sql).map_err(CricketError::read)?;
        if !stmt.readonly() {
            return Err(CricketError::ReadOnlyViolation);
        }
        collect_rows(&mut stmt, params)
    }
}

fn collect_rows(stmt: &mut Statement<'_>, params: &[&dyn ToSql]) -> Result<ResultSet> {
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let mut rows = stmt.query(params).map_err(CricketError::read)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(CricketError::read)? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(Cell::from(row.get_ref(idx).map_err(CricketError::read)?));
        }
        out.push(cells);
    }

    Ok(ResultSet { columns, rows: out })
}
