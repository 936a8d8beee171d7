//! Aerial Studio CLI - serve the landing page and manage studio records

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use aerial_studio::config::{self, StudioConfig};
use aerial_studio::server::routes::row_to_json;
use aerial_studio::storage::{SqliteStore, Table};
use aerial_studio::ui::{self, Icons};
use aerial_studio::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "aerial-studio")]
#[command(version)]
#[command(about = "Website backend for an aerial-gymnastics studio")]
#[command(long_about = r#"
Serves the studio landing page and manages its records
(news, service, clients, reviews) in a local SQLite file.

Example usage:
  aerial-studio serve --port 5000
  aerial-studio upsert --table clients --set name=Alice --set email=alice@example.com
  aerial-studio upsert --table clients --set phone=555-0200 --id 1
  aerial-studio select --table clients --where "email = ?" --param alice@example.com
  aerial-studio delete --table clients --column id --value 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database tables
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,

        /// Port to record in the config file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve the landing page
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Insert a row, or update the row with --id
    Upsert {
        /// Table name (news, service, clients, reviews)
        #[arg(short, long)]
        table: String,

        /// Column assignment, repeatable
        #[arg(short, long = "set", value_name = "COLUMN=VALUE", required = true)]
        set: Vec<String>,

        /// Id of the row to update
        #[arg(long)]
        id: Option<i64>,
    },

    /// Delete every row where a column equals a value
    Delete {
        /// Table name
        #[arg(short, long)]
        table: String,

        /// Column to match on
        #[arg(long)]
        column: String,

        /// Value to match (exact equality)
        #[arg(long)]
        value: String,
    },

    /// Print rows of a table
    Select {
        /// Table name
        #[arg(short, long)]
        table: String,

        /// Columns to show (comma separated, default all)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Filter expression placed after WHERE, using ? placeholders
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Values bound to the filter placeholders, in order
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show row counts per table
    Stats,
}

fn parse_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected COLUMN=VALUE, got '{}'", raw))?;
    Ok((column.trim().to_string(), Value::Text(value.to_string())))
}

fn open_store(config: &StudioConfig, database: Option<PathBuf>) -> anyhow::Result<SqliteStore> {
    let path = config.database_path(database);
    tracing::debug!("Opening database {:?}", path);
    Ok(SqliteStore::open_with_timeout(&path, config.busy_timeout())?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Init { force, port } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let database = config.database_path(cli.database);
            let written = StudioConfig {
                database: Some(database.display().to_string()),
                port: Some(config.port(port)),
                busy_timeout_ms: config.busy_timeout_ms,
            };
            config::write_config(&path, &written, force)?;
            SqliteStore::open_with_timeout(&database, written.busy_timeout())?;

            ui::success(&format!("Wrote {}", path.display()));
            ui::info("database", &database.display().to_string());
        }

        Commands::Serve { port } => {
            let store = open_store(&config, cli.database)?;
            let port = config.port(port);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(aerial_studio::server::start_server(port, store))?;
        }

        Commands::Upsert { table, set, id } => {
            let table: Table = table.parse()?;
            let store = open_store(&config, cli.database)?;

            let (columns, values): (Vec<String>, Vec<Value>) = set
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<anyhow::Result<Vec<_>>>()?
                .into_iter()
                .unzip();
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();

            let outcome = store.upsert(table, &columns, &values, id)?;
            match id {
                None => ui::success(&format!("{} Inserted {} row {}", Icons::NEW, table, outcome.id)),
                Some(_) if outcome.is_noop() => {
                    ui::warn(&format!("No {} row with id {}", table, outcome.id))
                }
                Some(_) => ui::success(&format!("{} Updated {} row {}", Icons::MOD, table, outcome.id)),
            }
        }

        Commands::Delete { table, column, value } => {
            let table: Table = table.parse()?;
            let store = open_store(&config, cli.database)?;

            let deleted = store.delete(table, &column, &Value::Text(value))?;
            if deleted == 0 {
                println!("{} No matching rows.", Icons::EMPTY);
            } else {
                ui::success(&format!("{} Deleted {} row(s) from {}", Icons::DEL, deleted, table));
            }
        }

        Commands::Select { table, columns, filter, params, format } => {
            let table: Table = table.parse()?;
            let store = open_store(&config, cli.database)?;

            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            let params: Vec<Value> = params.into_iter().map(Value::Text).collect();
            let rows = store.select(table, Some(columns.as_slice()), filter.as_deref(), &params)?;

            if format == "json" {
                let json: Vec<_> = rows.into_iter().map(row_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else if rows.is_empty() {
                println!("{} No rows found.", Icons::EMPTY);
            } else {
                println!("{}", ui::rows_table(&rows));
                ui::summary_row("rows:", &rows.len().to_string());
            }
        }

        Commands::Stats => {
            let store = open_store(&config, cli.database)?;
            let stats = store.stats()?;

            ui::header(&format!("{} Studio Statistics ({})", Icons::STATS, store.path().display()));
            println!("{}", ui::stats_table(&stats));
        }
    }

    Ok(())
}
