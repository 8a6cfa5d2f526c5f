//! Result rendering: aligned tables for people, CSV/TSV for machines.

use std::io::{self, Write};

use sql_edit::CellValue;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::db::QueryOutput;

/// Batch output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<OutputFormat> {
        match name.trim().to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "csv" => Some(OutputFormat::Csv),
            "tsv" => Some(OutputFormat::Tsv),
            _ => None,
        }
    }
}

/// Knobs for table rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Hard cap on a rendered column's width.
    pub max_column_width: usize,
    /// Text shown for NULL cells.
    pub null_text: String,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            max_column_width: 50,
            null_text: "NULL".to_string(),
        }
    }
}

/// Writes an aligned text table. Column widths fit the widest of header and
/// cells, capped at `max_column_width`; multi-line cells show their first
/// line with a `...` marker. Widths are display widths, so wide characters
/// line up.
pub fn write_table(
    out: &mut impl Write,
    output: &QueryOutput,
    opts: &RenderOptions,
) -> io::Result<()> {
    if output.columns.is_empty() {
        return Ok(());
    }

    let rendered: Vec<Vec<String>> = output
        .rows
        .iter()
        .map(|row| row.iter().map(|c| display_cell(c, &opts.null_text)).collect())
        .collect();

    let mut widths: Vec<usize> = output.columns.iter().map(|c| c.width()).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }
    for w in &mut widths {
        *w = (*w).min(opts.max_column_width);
    }

    let header: Vec<String> = output
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| fit(c, w))
        .collect();
    writeln!(out, "{}", header.join(" | "))?;

    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    writeln!(out, "{}", separator.join("-+-"))?;

    for row in &rendered {
        let cells: Vec<String> = row.iter().zip(&widths).map(|(c, &w)| fit(c, w)).collect();
        writeln!(out, "{}", cells.join(" | "))?;
    }
    Ok(())
}

/// Writes delimiter-separated rows. Fields containing the delimiter, a
/// double quote, or a newline are quoted with embedded quotes doubled;
/// multi-line cells survive intact here, unlike in table output.
pub fn write_delimited(
    out: &mut impl Write,
    output: &QueryOutput,
    delimiter: char,
    null_text: &str,
) -> io::Result<()> {
    let sep = delimiter.to_string();
    writeln!(out, "{}", output.columns.join(&sep))?;
    for row in &output.rows {
        let fields: Vec<String> = row
            .iter()
            .map(|cell| {
                let text = if cell.is_null { null_text } else { &cell.value };
                escape_field(text, delimiter)
            })
            .collect();
        writeln!(out, "{}", fields.join(&sep))?;
    }
    Ok(())
}

fn display_cell(cell: &CellValue, null_text: &str) -> String {
    if cell.is_null {
        return null_text.to_string();
    }
    match cell.value.find('\n') {
        Some(idx) => format!("{}...", &cell.value[..idx]),
        None => cell.value.clone(),
    }
}

/// Pads or truncates to an exact display width, marking truncation with
/// `...` when there is room for it.
fn fit(s: &str, width: usize) -> String {
    let w = s.width();
    if w > width {
        if width > 3 {
            format!("{}...", truncate_to_width(s, width - 3))
        } else {
            truncate_to_width(s, width)
        }
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

fn truncate_to_width(s: &str, width: usize) -> String {
    let mut result = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > width {
            break;
        }
        result.push(ch);
        used += cw;
    }
    result
}

fn escape_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
