//! `recstore` command-line entry point.
//!
//! # Responsibility
//! - `demo`: walk a scratch table through insert/update/delete, printing rows.
//! - `tasks`: print the task list envelope as JSON.
//!
//! Logging is only started when a log directory is configured.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recstore_core::{
    core_version, default_log_level, init_logging, ConnectionTarget, Record, RecordStore, Row,
    TaskService, Value, MEMORY_TARGET, TASKS_TABLE,
};

const DEMO_TABLE: &str = "foo";

#[derive(Debug, Parser)]
#[command(name = "recstore", version, about = "Table-scoped SQLite record store")]
struct Cli {
    /// Database file, or `:memory:` for a transient database.
    #[arg(long, global = true, default_value = MEMORY_TARGET)]
    db: String,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "RECSTORE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files.
    #[arg(long, global = true, env = "RECSTORE_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the CRUD walkthrough on a `foo` table.
    Demo,
    /// Print tasks as `{"tasks": [...]}`.
    Tasks {
        /// Insert the default tasks when the table is empty.
        #[arg(long)]
        seed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, log_dir).context("failed to initialize logging")?;
    }

    let target = ConnectionTarget::parse(&cli.db);
    match cli.command {
        Command::Demo => run_demo(target),
        Command::Tasks { seed } => run_tasks(target, seed),
    }
}

fn run_demo(target: ConnectionTarget) -> Result<()> {
    println!("version {}", core_version());

    println!("Open database {target} ...");
    let store = RecordStore::open(target, DEMO_TABLE)?;

    println!("Create table ...");
    store.execute_statement(&format!("DROP TABLE IF EXISTS {DEMO_TABLE}"), &[])?;
    store.execute_statement(
        &format!("CREATE TABLE {DEMO_TABLE} (id INTEGER PRIMARY KEY, string TEXT)"),
        &[],
    )?;

    println!("Insert into table ...");
    for text in ["one", "two", "three"] {
        store.insert(&Record::new().with("string", text.to_string()))?;
    }

    println!("Read from the table");
    print_all(&store)?;

    println!("Update table.");
    store.update(2, &Record::new().with("string", "TWO".to_string()))?;
    print_row(store.get_by_id(2)?.as_ref());

    println!("Insert an extra row ...");
    let new_id = store.insert(&Record::new().with("string", "extra".to_string()))?;
    println!("(id is {new_id})");
    print_row(store.get_by_id(new_id)?.as_ref());

    println!("Now delete our newly created row with id: {new_id}");
    store.delete(new_id)?;
    println!("Row has been deleted.");
    print_all(&store)?;
    println!("{} rows remain", store.count_all()?);

    store.close()?;
    Ok(())
}

fn run_tasks(target: ConnectionTarget, seed: bool) -> Result<()> {
    let store = RecordStore::open(target, TASKS_TABLE)?;
    let service = TaskService::new(store)?;
    service.ensure_schema()?;
    if seed {
        service.seed_defaults()?;
    }

    let envelope = service.tasks_envelope()?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    service.into_store().close()?;
    Ok(())
}

fn print_all(store: &RecordStore) -> Result<()> {
    let mut query = store.get_all()?;
    for row in query.rows()? {
        print_row(Some(&row?));
    }
    Ok(())
}

fn print_row(row: Option<&Row>) {
    let Some(row) = row else {
        println!("(no row)");
        return;
    };
    let fields = row
        .iter()
        .map(|(column, value)| format!("{column}={}", display_value(value)))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{{{fields}}}");
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(value) => value.to_string(),
        Value::Real(value) => value.to_string(),
        Value::Text(value) => format!("'{value}'"),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
