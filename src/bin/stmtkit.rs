//! stmtkit: render and run statements from option files
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a JSON or TOML option file
//! stmtkit render warehouse create wh.toml
//!
//! # Send it to the configured database
//! stmtkit render warehouse alter suspend.json --execute
//!
//! # List every supported resource/operation pair
//! stmtkit resources
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde_json::Value;
use stmtkit::config::Config;
use stmtkit::engine::{Row, SqlxTransport, Transport};
use stmtkit::resources::{self, StatementKind, OPERATIONS};
use stmtkit::error::StmtError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stmtkit")]
#[command(author = "stmtkit Contributors")]
#[command(version)]
#[command(about = "Declarative SQL statements from option files", long_about = None)]
#[command(after_help = "EXAMPLES:
    stmtkit render database create db.json
    stmtkit render warehouse alter suspend.toml --execute
    stmtkit resources")]
struct Cli {
    /// Output format for returned rows
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Database connection URL (overrides the config file)
    #[arg(long, env = "STMTKIT_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an option file and print the statement
    Render {
        /// Object type, e.g. `warehouse`
        resource: String,
        /// Statement, e.g. `create`
        operation: String,
        /// Option file (.json or .toml)
        file: PathBuf,
        /// Run the statement against the database
        #[arg(short, long)]
        execute: bool,
    },
    /// List supported resources and operations
    Resources,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Render {
            resource,
            operation,
            file,
            execute,
        } => render_file(resource, operation, file, *execute, &cli).await,
        Commands::Resources => {
            show_resources();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "stmtkit=debug" } else { "stmtkit=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn render_file(resource: &str, operation: &str, file: &Path, execute: bool, cli: &Cli) -> Result<()> {
    let op = resources::lookup(resource, operation).with_context(|| {
        format!("unknown operation '{} {}' (see `stmtkit resources`)", resource, operation)
    })?;

    let input = read_options(file)?;
    if cli.verbose {
        println!("{} {}", "Input:".dimmed(), file.display().to_string().yellow());
    }

    let sql = match op.prepare(input) {
        Ok(sql) => sql,
        Err(StmtError::Validation(violations)) => {
            eprintln!("{}", "Validation failed:".red().bold());
            for violation in violations.iter() {
                eprintln!("  • {}", violation);
            }
            bail!("{} rule(s) violated", violations.len());
        }
        Err(e) => return Err(e.into()),
    };

    if !execute {
        println!("{}", "Generated SQL:".green().bold());
        println!("{}", sql.white());
        return Ok(());
    }

    let config = Config::load()?.with_url(cli.database_url.clone());
    if config.connection.url.is_none() {
        println!("{}", "Generated SQL:".green().bold());
        println!("{}", sql.white());
        println!();
        println!(
            "{}",
            "⚠ No database URL. Use --database-url, set STMTKIT_DATABASE_URL or add [connection] url to stmtkit.toml"
                .yellow()
        );
        return Ok(());
    }

    let transport = SqlxTransport::from_config(&config.connection).await?;
    if cli.verbose {
        println!("{} {}", "Executing:".dimmed(), sql);
    }

    match op.kind {
        StatementKind::Query => {
            let rows = transport.fetch_all(&sql).await?;
            print_rows(&rows, &cli.format)?;
        }
        StatementKind::Exec => {
            let affected = transport.execute(&sql).await?;
            println!("{} {} rows affected", "✓".green(), affected);
        }
    }

    Ok(())
}

/// Read a JSON or TOML option file, chosen by extension.
fn read_options(file: &Path) -> Result<serde_json::Value> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let value = match file.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str::<serde_json::Value>(&content)
            .with_context(|| format!("invalid TOML in {}", file.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", file.display()))?,
    };
    Ok(value)
}

fn show_resources() {
    println!("{}", "Supported statements".cyan().bold());
    println!();
    println!(
        "{:12} {:10} {}",
        "Resource".white().bold(),
        "Operation".white().bold(),
        "Returns".white().bold()
    );
    println!("{}", "─".repeat(40).dimmed());

    for op in OPERATIONS {
        let returns = match op.kind {
            StatementKind::Query => "rows".yellow(),
            StatementKind::Exec => "count".dimmed(),
        };
        println!("{:12} {:10} {}", op.resource.cyan(), op.operation, returns);
    }
}

fn print_rows(rows: &[Row], format: &OutputFormat) -> Result<()> {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Table => {
            let table = RowTable::new(rows);
            println!("{}", table.header().white().bold());
            println!("{}", table.rule().dimmed());
            for line in table.body() {
                println!("{}", line);
            }
            println!();
            println!("{} row(s) returned", rows.len().to_string().cyan());
        }
    }
    Ok(())
}

/// Rows laid out as padded text columns, sorted by column name.
struct RowTable {
    columns: Vec<String>,
    cells: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl RowTable {
    fn new(rows: &[Row]) -> Self {
        let columns: Vec<String> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| row.get(c).map(cell_text).unwrap_or_default()).collect())
            .collect();
        let widths = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .fold(name.chars().count(), usize::max)
            })
            .collect();
        Self { columns, cells, widths }
    }

    fn line(&self, values: &[String]) -> String {
        values
            .iter()
            .zip(&self.widths)
            .map(|(value, width)| format!("{:width$}", value, width = *width))
            .collect::<Vec<_>>()
            .join(" │ ")
    }

    fn header(&self) -> String {
        self.line(&self.columns)
    }

    fn rule(&self) -> String {
        self.widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─")
    }

    fn body(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.iter().map(|row| self.line(row))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[(&str, Value)]) -> Row {
        cells.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_table_pads_and_fills_missing_cells() {
        let rows = vec![
            row(&[("name", Value::from("ANALYTICS")), ("size", Value::from("XSMALL"))]),
            row(&[("name", Value::from("WH")), ("owner", Value::Null)]),
        ];
        let table = RowTable::new(&rows);
        assert_eq!(table.header(), "name      │ owner │ size  ");
        assert_eq!(table.rule(), "──────────┼───────┼───────");
        assert_eq!(
            table.body().collect::<Vec<_>>(),
            vec!["ANALYTICS │       │ XSMALL", "WH        │ NULL  │       "]
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), "NULL");
        assert_eq!(cell_text(&Value::from("x")), "x");
        assert_eq!(cell_text(&Value::from(3)), "3");
        assert_eq!(cell_text(&Value::Bool(false)), "false");
    }
}
