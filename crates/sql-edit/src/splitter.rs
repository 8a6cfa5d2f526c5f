//! Statement splitting for multi-statement SQL buffers.

/// Statement prefixes that produce result rows rather than an affected-row
/// count. Matched case-insensitively on the first keyword.
const QUERY_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "TABLE", "VALUES", "PRAGMA",
];

/// Splits a SQL buffer into individual statements on top-level semicolons.
///
/// Semicolons inside single-quoted strings, double-quoted identifiers, `--`
/// line comments, and `/* */` block comments do not terminate a statement.
/// Both SQL-style doubled quotes (`''`, `""`) and backslash escapes inside
/// single quotes are honored. Returned statements are trimmed and never
/// empty; the terminating semicolon is not included. A trailing statement
/// without a semicolon is returned as well.
pub fn split_statements(sql: &str) -> Vec<String> {
    let bytes = sql.as_bytes();
    let n = bytes.len();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < n {
        match bytes[i] {
            // Line comment: runs through the newline, which stays part of
            // the surrounding statement text.
            b'-' if i + 1 < n && bytes[i + 1] == b'-' => {
                i += 2;
                while i < n && bytes[i] != b'\n' {
                    i += 1;
                }
                if i < n {
                    i += 1;
                }
            }
            // Block comment; an unterminated one runs to the end of input.
            b'/' if i + 1 < n && bytes[i + 1] == b'*' => {
                i += 2;
                while i < n {
                    if bytes[i] == b'*' && i + 1 < n && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            // String literal: '' is an escaped quote, \' likewise.
            b'\'' => {
                i += 1;
                while i < n {
                    if bytes[i] == b'\'' {
                        i += 1;
                        if i < n && bytes[i] == b'\'' {
                            i += 1;
                            continue;
                        }
                        break;
                    }
                    if bytes[i] == b'\\' && i + 1 < n {
                        i += 2;
                        continue;
                    }
                    i += 1;
                }
            }
            // Quoted identifier: "" is an escaped quote, no backslashes.
            b'"' => {
                i += 1;
                while i < n {
                    if bytes[i] == b'"' {
                        i += 1;
                        if i < n && bytes[i] == b'"' {
                            i += 1;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
            }
            b';' => {
                let stmt = sql[start..i].trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }

    let stmt = sql[start..].trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    statements
}

/// Reports whether a statement is expected to return rows (as opposed to an
/// affected-row count). The leading keyword must end at a word boundary, so
/// `SELECTIVE ...` does not count as a query.
pub fn is_query_statement(statement: &str) -> bool {
    let upper = statement.trim_start().to_uppercase();
    QUERY_KEYWORDS.iter().any(|kw| {
        upper
            .strip_prefix(kw)
            .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphabetic()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_statement_without_semicolon() {
        assert_eq!(
            split_statements("SELECT * FROM users"),
            vec!["SELECT * FROM users"]
        );
    }

    #[test]
    fn test_single_statement_with_semicolon() {
        assert_eq!(
            split_statements("SELECT * FROM users;"),
            vec!["SELECT * FROM users"]
        );
    }

    #[test]
    fn test_two_statements() {
        assert_eq!(
            split_statements("SELECT 1; SELECT 2"),
            vec!["SELECT 1", "SELECT 2"]
        );
    }

    #[test]
    fn test_semicolon_inside_single_quotes() {
        assert_eq!(
            split_statements("SELECT 'hello; world' FROM t; SELECT 2"),
            vec!["SELECT 'hello; world' FROM t", "SELECT 2"]
        );
    }

    #[test]
    fn test_semicolon_inside_double_quotes() {
        assert_eq!(
            split_statements("SELECT \"col;name\" FROM t; SELECT 2"),
            vec!["SELECT \"col;name\" FROM t", "SELECT 2"]
        );
    }

    #[test]
    fn test_doubled_single_quote_escape() {
        assert_eq!(
            split_statements("SELECT 'it''s a test; really'"),
            vec!["SELECT 'it''s a test; really'"]
        );
    }

    #[test]
    fn test_backslash_escape_in_single_quotes() {
        assert_eq!(
            split_statements("SELECT 'it\\'s a test; really'"),
            vec!["SELECT 'it\\'s a test; really'"]
        );
    }

    #[test]
    fn test_doubled_double_quote_escape() {
        assert_eq!(
            split_statements("SELECT \"a\"\"b;c\" FROM t; SELECT 2"),
            vec!["SELECT \"a\"\"b;c\" FROM t", "SELECT 2"]
        );
    }

    #[test]
    fn test_line_comment_keeps_semicolon() {
        assert_eq!(
            split_statements("SELECT 1; -- this is a comment; with semicolon\nSELECT 2"),
            vec![
                "SELECT 1",
                "-- this is a comment; with semicolon\nSELECT 2"
            ]
        );
    }

    #[test]
    fn test_block_comment_keeps_semicolon() {
        assert_eq!(
            split_statements("SELECT /* comment; here */ 1; SELECT 2"),
            vec!["SELECT /* comment; here */ 1", "SELECT 2"]
        );
    }

    #[test]
    fn test_multiline_block_comment() {
        assert_eq!(
            split_statements("SELECT /* multi\nline; comment */ 1"),
            vec!["SELECT /* multi\nline; comment */ 1"]
        );
    }

    #[test]
    fn test_empty_statements_suppressed() {
        assert_eq!(
            split_statements("SELECT 1;; ; SELECT 2;"),
            vec!["SELECT 1", "SELECT 2"]
        );
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(split_statements("   \n\t  ").is_empty());
        assert!(split_statements("").is_empty());
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(
            split_statements("SELECT 'abc; SELECT 2"),
            vec!["SELECT 'abc; SELECT 2"]
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(
            split_statements("SELECT 1 /* open; comment"),
            vec!["SELECT 1 /* open; comment"]
        );
    }

    #[test]
    fn test_mixed_statement_kinds() {
        assert_eq!(
            split_statements(
                "INSERT INTO t (a, b) VALUES ('x;y', 2); UPDATE t SET a = 'z' WHERE id = 1"
            ),
            vec![
                "INSERT INTO t (a, b) VALUES ('x;y', 2)",
                "UPDATE t SET a = 'z' WHERE id = 1"
            ]
        );
    }

    #[test]
    fn test_multiline_statements_preserved() {
        assert_eq!(
            split_statements("SELECT a,\n  b\nFROM t;\nSELECT 2"),
            vec!["SELECT a,\n  b\nFROM t", "SELECT 2"]
        );
    }

    #[test]
    fn test_split_is_stable_over_rejoin() {
        let text = "SELECT 'a;b' FROM t; -- c;\nUPDATE t SET x = 1; SELECT 2";
        let once = split_statements(text);
        let rejoined = format!("{};", once.join(";\n"));
        assert_eq!(split_statements(&rejoined), once);
    }

    #[test]
    fn test_query_statement_keywords() {
        for stmt in [
            "SELECT * FROM users",
            "select 1",
            "  SELECT 1",
            "\n\tSELECT 1",
            "WITH cte AS (SELECT 1) SELECT * FROM cte",
            "SHOW TABLES",
            "DESCRIBE users",
            "DESC users",
            "EXPLAIN SELECT 1",
            "TABLE users",
            "VALUES (1, 2)",
            "PRAGMA table_info(users)",
            "SELECT",
        ] {
            assert!(is_query_statement(stmt), "expected query: {stmt:?}");
        }
    }

    #[test]
    fn test_non_query_statements() {
        for stmt in [
            "INSERT INTO t VALUES (1)",
            "UPDATE t SET a = 1",
            "DELETE FROM t",
            "CREATE TABLE t (id INTEGER)",
            "DROP TABLE t",
            "",
            "   ",
        ] {
            assert!(!is_query_statement(stmt), "expected non-query: {stmt:?}");
        }
    }

    #[test]
    fn test_query_keyword_needs_word_boundary() {
        assert!(!is_query_statement("SELECTIVE SYNC ON"));
        assert!(!is_query_statement("SHOWING OFF"));
        assert!(!is_query_statement("TABLES"));
    }
}
