use std::env;
use std::io::{self, IsTerminal, Read};

use anyhow::{anyhow, bail, Context, Result};
use sql_edit::Dialect;
use squill::config::{self, load_connections, save_connections, ConnectionEntry};
use squill::db::SqliteExecutor;
use squill::history::History;
use squill::output::{OutputFormat, RenderOptions};
use squill::pipe::{run_batch, BatchOptions};

fn print_version() {
    println!("squill {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    let config_path = config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unavailable>".to_string());

    eprintln!("squill - batch SQL client with an editing engine");
    eprintln!();
    eprintln!("Usage: squill [OPTIONS] [DATABASE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [DATABASE]  SQLite database path, :memory:, or file: URI");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -f, --format <FORMAT>         Output format: table, csv, or tsv");
    eprintln!("  -c, --connection <NAME>       Use a saved connection");
    eprintln!("      --at <LINE[:COL]>         Run only the statement at this 1-based position");
    eprintln!("      --list-connections        List saved connections");
    eprintln!("      --add-connection <NAME>   Save a connection (requires --url)");
    eprintln!("      --url <URL>               Connection string for --add-connection");
    eprintln!("      --remove-connection <NAME>");
    eprintln!("                                Remove a saved connection");
    eprintln!("      --history [PATTERN]       Show history, fuzzy-filtered by PATTERN");
    eprintln!("  -h, --help                    Print help information");
    eprintln!("  -V, --version                 Print version information");
    eprintln!();
    eprintln!("Environment Variables:");
    eprintln!("  DATABASE_URL       Database to use when no argument is given");
    eprintln!("  SQUILL_CONFIG_DIR  Override the configuration directory");
    eprintln!();
    eprintln!("Configuration:");
    eprintln!("  Config file: {config_path}");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  echo 'SELECT * FROM users' | squill app.db");
    eprintln!("  squill --format csv app.db < report.sql");
    eprintln!("  squill --at 12:4 app.db < scratch.sql");
    eprintln!("  squill --add-connection dev --url ./dev.sqlite3");
}

/// Parsed command line.
#[derive(Debug, Default)]
struct CliArgs {
    database: Option<String>,
    connection: Option<String>,
    format: Option<String>,
    at: Option<String>,
    list_connections: bool,
    add_connection: Option<String>,
    add_url: Option<String>,
    remove_connection: Option<String>,
    history: bool,
    history_pattern: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--format" => parsed.format = Some(take_value(args, &mut i, "--format")?),
            "-c" | "--connection" => {
                parsed.connection = Some(take_value(args, &mut i, "--connection")?)
            }
            "--at" => parsed.at = Some(take_value(args, &mut i, "--at")?),
            "--list-connections" => parsed.list_connections = true,
            "--add-connection" => {
                parsed.add_connection = Some(take_value(args, &mut i, "--add-connection")?)
            }
            "--url" => parsed.add_url = Some(take_value(args, &mut i, "--url")?),
            "--remove-connection" => {
                parsed.remove_connection = Some(take_value(args, &mut i, "--remove-connection")?)
            }
            "--history" => {
                parsed.history = true;
                if let Some(next) = args.get(i + 1) {
                    if !next.starts_with('-') {
                        parsed.history_pattern = Some(next.clone());
                        i += 1;
                    }
                }
            }
            other if other.starts_with('-') => {
                bail!("unknown option {other:?}; run squill --help for usage")
            }
            other => {
                if parsed.database.is_some() {
                    bail!("unexpected argument {other:?}; only one database can be given");
                }
                parsed.database = Some(other.to_string());
            }
        }
        i += 1;
    }
    Ok(parsed)
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("{flag} requires a value"))
}

/// Parses `--at LINE[:COL]` into a one-based (line, column) pair.
fn parse_at(value: &str) -> Result<(usize, usize)> {
    let (line, column) = match value.split_once(':') {
        Some((l, c)) => (l, c),
        None => (value, "1"),
    };
    let line: usize = line
        .parse()
        .with_context(|| format!("invalid --at line in {value:?}"))?;
    let column: usize = column
        .parse()
        .with_context(|| format!("invalid --at column in {value:?}"))?;
    if line == 0 || column == 0 {
        bail!("--at positions are 1-based");
    }
    Ok((line, column))
}

fn main() -> Result<()> {
    env_logger::init();

    let raw_args: Vec<String> = env::args().skip(1).collect();
    if raw_args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }
    if raw_args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }
    let args = parse_args(&raw_args)?;

    if args.list_connections {
        return handle_list_connections();
    }
    if let Some(name) = &args.remove_connection {
        return handle_remove_connection(name);
    }
    if let Some(name) = &args.add_connection {
        return handle_add_connection(name, args.add_url.as_deref());
    }

    let cfg = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {e:#}");
        config::Config::default()
    });

    if args.history {
        return handle_history(&cfg, args.history_pattern.as_deref());
    }

    // Database priority: CLI argument > saved connection > DATABASE_URL.
    let (dsn, label, saved_dialect) = if let Some(database) = args.database {
        (database, None, None)
    } else if let Some(name) = args.connection {
        let connections = load_connections()?;
        let entry = connections
            .find_by_name(&name)
            .ok_or_else(|| anyhow!("connection {name:?} not found; see --list-connections"))?;
        let declared = entry.dialect.as_deref().map(Dialect::from_name);
        (entry.url.clone(), Some(name), declared)
    } else if let Ok(url) = env::var("DATABASE_URL") {
        (url, None, None)
    } else {
        print_usage();
        bail!("no database given: pass a path, --connection, or set DATABASE_URL");
    };

    // Unrecognized targets are treated as SQLite paths; that is what the
    // built-in executor opens anyway.
    let dialect =
        saved_dialect.unwrap_or_else(|| Dialect::from_dsn(&dsn).unwrap_or(Dialect::Sqlite));
    if dialect != Dialect::Sqlite {
        bail!("{dialect} connections are not supported yet; squill currently opens SQLite targets only");
    }

    if io::stdin().is_terminal() {
        print_usage();
        bail!("squill reads SQL from stdin; pipe a script in");
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read from stdin")?;

    let format_name = args.format.unwrap_or_else(|| cfg.output.format.clone());
    let format = OutputFormat::parse(&format_name)
        .ok_or_else(|| anyhow!("unknown output format {format_name:?}; expected table, csv, or tsv"))?;
    let at = args.at.as_deref().map(parse_at).transpose()?;

    log::info!("opening sqlite database {dsn}");
    let mut executor = SqliteExecutor::open(&dsn)?;
    let opts = BatchOptions {
        format,
        render: RenderOptions {
            max_column_width: cfg.output.max_column_width,
            null_text: cfg.output.null_text.clone(),
        },
        at,
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut executed = Vec::new();
    let result = run_batch(
        &mut executor,
        &input,
        &opts,
        &mut stdout.lock(),
        &mut stderr.lock(),
        &mut executed,
    );

    // Record what ran even when a later statement failed the batch.
    if cfg.history.enabled && !executed.is_empty() {
        record_history(&cfg, &executed, label.unwrap_or(dsn));
    }
    result
}

fn record_history(cfg: &config::Config, statements: &[String], label: String) {
    match History::load(cfg.history.max_entries) {
        Ok(mut history) => {
            for stmt in statements {
                history.push(stmt, Some(label.clone()));
            }
            if let Err(e) = history.save() {
                eprintln!("Warning: Failed to save history: {e:#}");
            }
        }
        Err(e) => eprintln!("Warning: Failed to load history: {e:#}"),
    }
}

fn handle_history(cfg: &config::Config, pattern: Option<&str>) -> Result<()> {
    let history = History::load(cfg.history.max_entries).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load history: {e:#}");
        History::new_empty(cfg.history.max_entries)
    });
    let matches = history.search(pattern.unwrap_or(""));
    if matches.is_empty() {
        eprintln!("No history entries.");
        return Ok(());
    }
    for m in matches {
        println!(
            "{}  {}",
            m.entry.timestamp.format("%Y-%m-%d %H:%M"),
            m.entry.statement
        );
    }
    Ok(())
}

fn handle_list_connections() -> Result<()> {
    let connections = load_connections()?;
    if connections.connections.is_empty() {
        eprintln!("No saved connections.");
        return Ok(());
    }
    println!("Saved connections:");
    for entry in &connections.connections {
        println!("  {:16} {:8} {}", entry.name, entry.dialect(), entry.display_url());
    }
    Ok(())
}

fn handle_add_connection(name: &str, url: Option<&str>) -> Result<()> {
    let url = url.ok_or_else(|| anyhow!("--add-connection requires --url"))?;
    let mut connections = load_connections()?;
    connections.add(ConnectionEntry::new(name, url))?;
    save_connections(&connections)?;
    println!("Connection {name:?} saved.");
    Ok(())
}

fn handle_remove_connection(name: &str) -> Result<()> {
    let mut connections = load_connections()?;
    connections.remove(name)?;
    save_connections(&connections)?;
    println!("Connection {name:?} removed.");
    Ok(())
}
