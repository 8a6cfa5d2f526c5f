//! Shared fixtures for squill integration tests.

use sql_edit::ColumnType;
use squill::db::{QueryExecutor, QueryOutput, SqliteExecutor};

/// An in-memory database with the kind of data an interactive session
/// browses: NULLs, a multiline cell, numeric and boolean columns, and a
/// second table to join against.
pub fn seeded_executor() -> SqliteExecutor {
    let mut ex = SqliteExecutor::open_in_memory().expect("open in-memory database");
    for stmt in [
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            age INTEGER,
            salary REAL,
            is_active BOOLEAN DEFAULT 1,
            notes TEXT
        )",
        "INSERT INTO users (id, name, email, age, salary, is_active, notes) VALUES
            (1, 'Alice', 'alice@example.com', 30, 50000.5, 1, 'First user'),
            (2, 'Bob', NULL, 25, NULL, 0, NULL),
            (3, 'Charlie', 'charlie@example.com', 35, 75000.0, 1, 'Line 1\nLine 2\nLine 3')",
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER, total REAL)",
        "INSERT INTO orders (id, user_id, total) VALUES (1, 1, 9.99), (2, 3, 120.0)",
    ] {
        ex.execute(stmt).expect("seed statement");
    }
    ex
}

/// Maps an output's driver type names to engine column types.
pub fn types_of(output: &QueryOutput) -> Vec<ColumnType> {
    output
        .type_names
        .iter()
        .map(|name| ColumnType::from_type_name(name))
        .collect()
}
