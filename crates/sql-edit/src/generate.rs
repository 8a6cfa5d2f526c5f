//! UPDATE/DELETE/INSERT generation from edited result rows.

use crate::classify::QueryMeta;
use crate::dialect::Dialect;
use crate::types::{CellValue, ColumnType};
use crate::value::format_sql_value;

/// One column of a row under edit: the fetched cell plus the current input
/// state. An edit is pending when either the text or the NULL flag differs
/// from the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub original: CellValue,
    pub input: String,
    pub is_null: bool,
    pub column_type: ColumnType,
}

impl FieldEdit {
    fn is_changed(&self) -> bool {
        self.input != self.original.value || self.is_null != self.original.is_null
    }
}

/// Edit state for a whole row, indexed like the result columns it came
/// from. This is a plain value: build it from a fetched row, mutate it as
/// the user types, hand it to a generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEdit {
    pub fields: Vec<FieldEdit>,
}

impl RowEdit {
    /// Seeds the edit state from a fetched row: inputs start as the cell
    /// text, NULL flags as the cell's nullness.
    pub fn from_row(row: &[CellValue], column_types: &[ColumnType]) -> RowEdit {
        let fields = row
            .iter()
            .zip(column_types)
            .map(|(cell, &column_type)| FieldEdit {
                original: cell.clone(),
                input: cell.value.clone(),
                is_null: cell.is_null,
                column_type,
            })
            .collect();
        RowEdit { fields }
    }

    /// Replaces the input text for one field. Typing a value always makes
    /// the field non-NULL.
    pub fn set_input(&mut self, index: usize, text: impl Into<String>) {
        let field = &mut self.fields[index];
        field.input = text.into();
        field.is_null = false;
    }

    /// Flips a field's NULL flag; turning NULL on clears the input text.
    pub fn toggle_null(&mut self, index: usize) {
        let field = &mut self.fields[index];
        field.is_null = !field.is_null;
        if field.is_null {
            field.input.clear();
        }
    }
}

/// Builds an UPDATE for the changed fields of a row, or `None` when the
/// result is not editable or nothing changed. The WHERE clause always keys
/// on the original id value, so editing the id column itself moves the row
/// without losing it.
///
/// `columns` are the result column names; panics if `meta.id_index` is out
/// of range for the edit fields.
pub fn generate_update(
    meta: &QueryMeta,
    dialect: Dialect,
    columns: &[String],
    edit: &RowEdit,
) -> Option<String> {
    if !meta.is_editable {
        return None;
    }
    assert_id_in_range(meta, edit);

    let mut assignments = Vec::new();
    for (column, field) in columns.iter().zip(&edit.fields) {
        if field.is_changed() {
            let literal = format_sql_value(&field.input, field.is_null, field.column_type, dialect);
            assignments.push(format!("{} = {}", dialect.quote_ident(column), literal));
        }
    }
    if assignments.is_empty() {
        return None;
    }

    Some(format!(
        "UPDATE {} SET {} WHERE {} = {}",
        dialect.quote_ident(&meta.table_name),
        assignments.join(", "),
        dialect.quote_ident(&meta.id_column),
        original_id_literal(meta, dialect, edit),
    ))
}

/// Builds a DELETE keyed on the row's original id value, or `None` when the
/// result is not editable. Panics if `meta.id_index` is out of range.
pub fn generate_delete(meta: &QueryMeta, dialect: Dialect, edit: &RowEdit) -> Option<String> {
    if !meta.is_editable {
        return None;
    }
    assert_id_in_range(meta, edit);

    Some(format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote_ident(&meta.table_name),
        dialect.quote_ident(&meta.id_column),
        original_id_literal(meta, dialect, edit),
    ))
}

/// Builds an INSERT from the row's current values, skipping the id column
/// so the database assigns a fresh key. Returns `None` when the result is
/// not editable. Panics if `meta.id_index` is out of range.
pub fn generate_insert(
    meta: &QueryMeta,
    dialect: Dialect,
    columns: &[String],
    edit: &RowEdit,
) -> Option<String> {
    if !meta.is_editable {
        return None;
    }
    assert_id_in_range(meta, edit);

    let mut names = Vec::new();
    let mut values = Vec::new();
    for (i, (column, field)) in columns.iter().zip(&edit.fields).enumerate() {
        if i == meta.id_index {
            continue;
        }
        names.push(dialect.quote_ident(column));
        values.push(format_sql_value(
            &field.input,
            field.is_null,
            field.column_type,
            dialect,
        ));
    }

    Some(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_ident(&meta.table_name),
        names.join(", "),
        values.join(", "),
    ))
}

// id_index must address the edit fields; anything else is a caller bug.
fn assert_id_in_range(meta: &QueryMeta, edit: &RowEdit) {
    assert!(
        meta.id_index < edit.fields.len(),
        "id index {} out of range for {} fields",
        meta.id_index,
        edit.fields.len()
    );
}

// The id cell is the row key: formatted from its original value and never
// as NULL, whatever the edit state says.
fn original_id_literal(meta: &QueryMeta, dialect: Dialect, edit: &RowEdit) -> String {
    let id = &edit.fields[meta.id_index];
    format_sql_value(&id.original.value, false, id.column_type, dialect)
}
