//! # sql-edit
//!
//! The SQL editing engine behind squill: statement splitting, cursor
//! resolution, result editability analysis, and safe statement generation.
//!
//! Everything in this crate is a pure function over plain values. There is
//! no I/O and no database access; the caller owns the buffer and the result
//! metadata, and the engine turns them into statements and SQL text.
//!
//! ## Features
//!
//! - Quote- and comment-aware splitting of multi-statement buffers
//! - Cursor-to-statement resolution for run-under-cursor workflows
//! - Column type categorization from driver-reported type names
//! - Editability analysis of SELECT results (base table plus id column)
//! - Injection-safe literal formatting and UPDATE/DELETE/INSERT generation
//!
//! ## Example
//!
//! ```rust
//! use sql_edit::{
//!     classify_query, generate_update, CellValue, ColumnType, Dialect, RowEdit,
//!     split_statements,
//! };
//!
//! let statements = split_statements("SELECT 1; SELECT 'a;b';");
//! assert_eq!(statements, vec!["SELECT 1", "SELECT 'a;b'"]);
//!
//! let columns = vec!["id".to_string(), "name".to_string()];
//! let meta = classify_query("SELECT * FROM users", &columns).unwrap();
//! assert!(meta.is_editable);
//!
//! let row = [CellValue::new("1"), CellValue::new("Alice")];
//! let types = [ColumnType::Numeric, ColumnType::Text];
//! let mut edit = RowEdit::from_row(&row, &types);
//! edit.set_input(1, "Alyce");
//!
//! let sql = generate_update(&meta, Dialect::Sqlite, &columns, &edit).unwrap();
//! assert_eq!(sql, r#"UPDATE "users" SET "name" = 'Alyce' WHERE "id" = 1"#);
//! ```

mod classify;
mod dialect;
mod generate;
mod locator;
mod splitter;
mod types;
mod value;

pub use classify::{classify_query, QueryMeta};
pub use dialect::Dialect;
pub use generate::{generate_delete, generate_insert, generate_update, FieldEdit, RowEdit};
pub use locator::statement_under_cursor;
pub use splitter::{is_query_statement, split_statements};
pub use types::{CellValue, ColumnType};
pub use value::{escape_sql_string, format_sql_value, is_valid_number};
