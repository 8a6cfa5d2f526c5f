//! Cell values and column type categories shared across the engine.

use std::fmt;

/// Broad category of a result column, derived from the driver-reported type
/// name. Categories drive literal formatting, not storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Numeric,
    Boolean,
    Datetime,
    Blob,
    Unknown,
}

const NUMERIC_KEYWORDS: &[&str] = &["INT", "SERIAL", "DECIMAL", "NUMERIC", "REAL", "FLOAT", "DOUBLE"];
const BOOLEAN_KEYWORDS: &[&str] = &["BOOL", "BIT"];
const DATETIME_KEYWORDS: &[&str] = &["DATE", "TIME", "TIMESTAMP"];
const BLOB_KEYWORDS: &[&str] = &["BLOB", "BYTEA", "BINARY"];
const TEXT_KEYWORDS: &[&str] = &["CHAR", "TEXT", "JSON", "UUID", "ENUM"];

impl ColumnType {
    /// Categorizes a driver-reported type name by uppercase substring match.
    /// Numeric wins over boolean, boolean over datetime, and so on, so
    /// `BIGINT` is numeric even though drivers embellish it freely. Names
    /// matching nothing (including the empty string) are [`ColumnType::Unknown`].
    pub fn from_type_name(name: &str) -> ColumnType {
        let upper = name.to_uppercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|kw| upper.contains(kw));

        if matches(NUMERIC_KEYWORDS) {
            ColumnType::Numeric
        } else if matches(BOOLEAN_KEYWORDS) {
            ColumnType::Boolean
        } else if matches(DATETIME_KEYWORDS) {
            ColumnType::Datetime
        } else if matches(BLOB_KEYWORDS) {
            ColumnType::Blob
        } else if matches(TEXT_KEYWORDS) {
            ColumnType::Text
        } else {
            ColumnType::Unknown
        }
    }
}

/// A single result cell: its text rendering plus an explicit NULL flag, so
/// NULL and the empty string stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellValue {
    pub value: String,
    pub is_null: bool,
}

impl CellValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_null: false,
        }
    }

    pub fn null() -> Self {
        Self {
            value: String::new(),
            is_null: true,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null {
            write!(f, "<NULL>")
        } else {
            write!(f, "{}", self.value)
        }
    }
}
