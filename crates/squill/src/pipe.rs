//! Batch mode: take a SQL buffer, run its statements, render the results.

use std::io::Write;

use anyhow::{bail, Context, Result};
use sql_edit::{split_statements, statement_under_cursor};

use crate::db::QueryExecutor;
use crate::output::{self, OutputFormat, RenderOptions};

/// Settings for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub format: OutputFormat,
    pub render: RenderOptions,
    /// Run only the statement at this one-based line/column instead of the
    /// whole buffer.
    pub at: Option<(usize, usize)>,
}

/// Runs a SQL buffer against an executor: splits it into statements (or
/// resolves the one under `at`), executes them in order, and renders each
/// result. Row data goes to `stdout`; row counts and affected counts go to
/// `stderr` so piped output stays clean. Execution stops at the first
/// failing statement.
///
/// Each statement is appended to `executed` as soon as it runs, so after a
/// mid-batch failure the caller still sees the prefix that completed.
pub fn run_batch(
    executor: &mut impl QueryExecutor,
    input: &str,
    opts: &BatchOptions,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
    executed: &mut Vec<String>,
) -> Result<()> {
    let statements = match opts.at {
        Some((line, column)) => {
            let stmt = statement_under_cursor(
                input,
                line.saturating_sub(1),
                column.saturating_sub(1),
            );
            if stmt.is_empty() {
                bail!("no complete statement at {line}:{column}");
            }
            vec![stmt]
        }
        None => split_statements(input),
    };
    if statements.is_empty() {
        bail!("no SQL statements in input");
    }

    for (idx, stmt) in statements.iter().enumerate() {
        log::debug!("executing statement {}: {stmt}", idx + 1);
        let result = executor
            .execute(stmt)
            .with_context(|| format!("statement {} failed", idx + 1))?;
        executed.push(stmt.clone());

        if let Some(affected) = result.affected {
            writeln!(stderr, "({affected} rows affected)")?;
            continue;
        }
        match opts.format {
            OutputFormat::Table => {
                output::write_table(stdout, &result, &opts.render)?;
                writeln!(stderr, "\n({} rows)", result.rows.len())?;
            }
            OutputFormat::Csv => {
                output::write_delimited(stdout, &result, ',', &opts.render.null_text)?
            }
            OutputFormat::Tsv => {
                output::write_delimited(stdout, &result, '\t', &opts.render.null_text)?
            }
        }
    }

    Ok(())
}
