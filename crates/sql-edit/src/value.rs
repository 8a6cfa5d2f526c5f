//! SQL literal formatting for generated statements.
//!
//! Every user-edited value passes through [`format_sql_value`] before it is
//! spliced into SQL text. Anything not provably safe to emit bare (a
//! validated number, a recognized boolean) is single-quoted with embedded
//! quotes doubled.

use crate::dialect::Dialect;
use crate::types::ColumnType;

/// Escapes a string for inclusion in a single-quoted SQL literal by
/// doubling embedded single quotes.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Strict decimal number check: optional sign, digits with at most one
/// decimal point, optional exponent. Rejects the empty string, lone signs
/// and dots, and anything with trailing garbage.
pub fn is_valid_number(text: &str) -> bool {
    let s = text.trim().as_bytes();
    let mut i = 0;

    if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
        i += 1;
    }

    let mut digits = 0;
    let mut seen_dot = false;
    while i < s.len() {
        match s[i] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        i += 1;
    }
    if digits == 0 {
        return false;
    }

    if i < s.len() && (s[i] == b'e' || s[i] == b'E') {
        i += 1;
        if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == s.len()
}

/// Renders a cell value as a SQL literal.
///
/// NULL wins over everything, the empty string is always `''`, numeric
/// columns emit validated numbers bare, boolean columns map recognized
/// spellings to the dialect's literals, and everything else (including
/// values that fail validation) is quoted and escaped.
pub fn format_sql_value(
    value: &str,
    is_null: bool,
    column_type: ColumnType,
    dialect: Dialect,
) -> String {
    if is_null {
        return "NULL".to_string();
    }
    if value.is_empty() {
        return "''".to_string();
    }

    match column_type {
        ColumnType::Numeric => {
            if is_valid_number(value) {
                value.to_string()
            } else {
                format!("'{}'", escape_sql_string(value))
            }
        }
        ColumnType::Boolean => match value.to_lowercase().as_str() {
            "true" | "t" | "yes" | "on" | "1" => dialect.true_literal().to_string(),
            "false" | "f" | "no" | "off" | "0" => dialect.false_literal().to_string(),
            _ => format!("'{}'", escape_sql_string(value)),
        },
        _ => format!("'{}'", escape_sql_string(value)),
    }
}
