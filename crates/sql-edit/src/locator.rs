//! Cursor-to-statement resolution for run-under-cursor workflows.

/// Returns the complete statement containing the cursor, or an empty string
/// when the cursor does not sit inside one.
///
/// `line` and `column` are zero-based; `column` is a byte offset into the
/// line and is clamped to the line length. The buffer is partitioned into
/// segments by its semicolons (this scan is quote-blind, so a semicolon
/// inside a string literal also ends a segment) and the cursor selects the
/// segment whose terminating semicolon is the first one at or after it.
///
/// With the cursor after the last semicolon, trailing whitespace resolves to
/// the final complete statement; trailing unterminated text resolves to
/// nothing, since that text is not yet a statement.
pub fn statement_under_cursor(text: &str, line: usize, column: usize) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let mut cursor_pos = 0;
    for l in lines.iter().take(line) {
        cursor_pos += l.len() + 1;
    }
    if line < lines.len() {
        cursor_pos += column.min(lines[line].len());
    }

    let semicolons: Vec<usize> = text.match_indices(';').map(|(i, _)| i).collect();
    if semicolons.is_empty() {
        return String::new();
    }

    let mut start = 0;
    for &semi in &semicolons {
        if cursor_pos <= semi {
            return finish_segment(&text[start..=semi]);
        }
        start = semi + 1;
    }

    // Cursor is past the last semicolon.
    if text[start..].trim().is_empty() {
        let last = semicolons[semicolons.len() - 1];
        let prev_start = if semicolons.len() > 1 {
            semicolons[semicolons.len() - 2] + 1
        } else {
            0
        };
        return finish_segment(&text[prev_start..=last]);
    }
    String::new()
}

/// Trims a raw segment and strips its terminating semicolon.
fn finish_segment(segment: &str) -> String {
    let s = segment.trim();
    let s = s.strip_suffix(';').unwrap_or(s);
    s.trim().to_string()
}
