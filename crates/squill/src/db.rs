//! Query execution: the `QueryExecutor` seam and its SQLite implementation.
//!
//! Executors speak in already-rendered text cells so the rest of the program
//! (and the sql-edit engine) never touches driver-native value types.

use std::fmt;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use sql_edit::{is_query_statement, CellValue};

/// Error from opening a database or executing a statement.
#[derive(Debug)]
pub enum ExecError {
    /// The database target could not be opened.
    Open(String),
    /// A statement failed at the database.
    Sql(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Open(msg) => write!(f, "Failed to open database: {msg}"),
            ExecError::Sql(msg) => write!(f, "Query error: {msg}"),
        }
    }
}

impl std::error::Error for ExecError {}

/// Result of executing one statement. A row-returning statement fills
/// `columns`/`type_names`/`rows` and leaves `affected` unset; anything else
/// reports only the affected-row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    /// Driver-reported declared type per column; empty string when the
    /// driver has none (computed expressions, some views).
    pub type_names: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub affected: Option<u64>,
}

/// Executes single SQL statements against some database. Statements arrive
/// pre-split; an executor never has to deal with semicolon-separated input.
pub trait QueryExecutor {
    fn execute(&mut self, sql: &str) -> Result<QueryOutput, ExecError>;
}

/// A [`QueryExecutor`] over a rusqlite connection. Accepts filesystem
/// paths, `:memory:`, and `file:` URIs.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn open(target: &str) -> Result<SqliteExecutor, ExecError> {
        let conn = Connection::open(target).map_err(|e| ExecError::Open(e.to_string()))?;
        Ok(SqliteExecutor { conn })
    }

    pub fn open_in_memory() -> Result<SqliteExecutor, ExecError> {
        let conn = Connection::open_in_memory().map_err(|e| ExecError::Open(e.to_string()))?;
        Ok(SqliteExecutor { conn })
    }

    fn run_query(&self, sql: &str) -> Result<QueryOutput, ExecError> {
        let mut stmt = self.conn.prepare(sql).map_err(sql_err)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let type_names: Vec<String> = stmt
            .columns()
            .iter()
            .map(|c| c.decl_type().unwrap_or("").to_string())
            .collect();
        let column_count = columns.len();

        let mut out_rows = Vec::new();
        let mut rows = stmt.query([]).map_err(sql_err)?;
        while let Some(row) = rows.next().map_err(sql_err)? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                cells.push(render_cell(row.get_ref(i).map_err(sql_err)?));
            }
            out_rows.push(cells);
        }

        Ok(QueryOutput {
            columns,
            type_names,
            rows: out_rows,
            affected: None,
        })
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&mut self, sql: &str) -> Result<QueryOutput, ExecError> {
        if is_query_statement(sql) {
            self.run_query(sql)
        } else {
            let affected = self.conn.execute(sql, []).map_err(sql_err)?;
            Ok(QueryOutput {
                affected: Some(affected as u64),
                ..QueryOutput::default()
            })
        }
    }
}

fn sql_err(e: rusqlite::Error) -> ExecError {
    ExecError::Sql(e.to_string())
}

/// Renders a driver value as text. Blobs and non-UTF-8 text come through
/// lossily; this is a display pipeline, not a byte-preserving one.
fn render_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::null(),
        ValueRef::Integer(n) => CellValue::new(n.to_string()),
        ValueRef::Real(f) => CellValue::new(f.to_string()),
        ValueRef::Text(t) => CellValue::new(String::from_utf8_lossy(t)),
        ValueRef::Blob(b) => CellValue::new(String::from_utf8_lossy(b)),
    }
}
