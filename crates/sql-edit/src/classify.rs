//! SELECT analysis: can the rows of this result be edited in place?

/// How a result set maps back to a base table. Produced by
/// [`classify_query`]; consumed by the statement generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMeta {
    /// Base table the statement selects from. Empty when not editable.
    pub table_name: String,
    /// True when rows can be written back: single table, no aggregation,
    /// and an `id` column present in the result.
    pub is_editable: bool,
    /// The `id` column's name as it appears in the result.
    pub id_column: String,
    /// Index of the `id` column within the result columns.
    pub id_index: usize,
}

impl QueryMeta {
    fn not_editable() -> QueryMeta {
        QueryMeta {
            table_name: String::new(),
            is_editable: false,
            id_column: String::new(),
            id_index: 0,
        }
    }
}

/// Substrings whose presence means the result rows no longer correspond
/// one-to-one to table rows.
const AGGREGATE_MARKERS: &[&str] = &[
    "COUNT(",
    "SUM(",
    "AVG(",
    "MIN(",
    "MAX(",
    "GROUP_CONCAT(",
    "GROUP BY",
    "HAVING",
    "DISTINCT",
];

/// Decides whether a statement's result set is editable and, if so, which
/// table and key column edits should target.
///
/// Returns `None` for anything that is not a SELECT. SELECTs that
/// aggregate, join, read multiple tables, or lack an `id` result column get
/// a non-editable [`QueryMeta`]. The analysis is deliberately textual: it
/// prefers calling an editable query non-editable over the reverse.
pub fn classify_query(statement: &str, columns: &[String]) -> Option<QueryMeta> {
    let query = statement.trim();
    let upper = query.to_uppercase();

    if !upper.starts_with("SELECT") {
        return None;
    }

    if AGGREGATE_MARKERS.iter().any(|m| upper.contains(m)) {
        return Some(QueryMeta::not_editable());
    }
    if upper.contains(" JOIN ") {
        return Some(QueryMeta::not_editable());
    }

    let Some(from_idx) = find_ci(query, " FROM ") else {
        return Some(QueryMeta::not_editable());
    };
    let after_from = &query[from_idx + " FROM ".len()..];

    let mut table_part = match find_ci(after_from, " WHERE ") {
        Some(idx) => &after_from[..idx],
        None => after_from,
    };
    for clause in [" ORDER BY ", " LIMIT ", " GROUP BY "] {
        if let Some(idx) = find_ci(table_part, clause) {
            table_part = &table_part[..idx];
        }
    }
    let table_part = table_part.trim();

    if table_part.contains(',') {
        return Some(QueryMeta::not_editable());
    }
    let table_name = extract_table_name(table_part);
    if table_name.is_empty() {
        return Some(QueryMeta::not_editable());
    }

    let Some((id_index, id_column)) = columns
        .iter()
        .enumerate()
        .find(|(_, c)| c.to_lowercase() == "id")
    else {
        return Some(QueryMeta::not_editable());
    };

    Some(QueryMeta {
        table_name,
        is_editable: true,
        id_column: id_column.clone(),
        id_index,
    })
}

/// First token of the FROM clause with backticks removed; aliases and
/// surrounding whitespace are dropped.
fn extract_table_name(table_part: &str) -> String {
    let stripped = table_part.replace('`', "");
    stripped
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

/// ASCII case-insensitive substring search. The needle is ASCII, so the
/// returned index is always a character boundary in the haystack.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let nd = needle.as_bytes();
    if h.len() < nd.len() {
        return None;
    }
    (0..=h.len() - nd.len()).find(|&i| h[i..i + nd.len()].eq_ignore_ascii_case(nd))
}
