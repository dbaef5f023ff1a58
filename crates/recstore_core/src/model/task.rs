//! Task projection of the `tasks` table.
//!
//! # Responsibility
//! - Define the typed task shape served by the task list envelope.
//! - Convert between `Row`/`Record` and `Task`.
//!
//! # Invariants
//! - `done` is persisted as INTEGER `0` or `1`; any other value is malformed.
//! - `Task::to_record` never carries `id`, so inserts let SQLite assign it.

use crate::model::record::{Record, ID_COLUMN};
use crate::model::row::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Table the task projection is stored in.
pub const TASKS_TABLE: &str = "tasks";

/// Schema for `TASKS_TABLE`.
pub const TASKS_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    done INTEGER NOT NULL DEFAULT 0 CHECK (done IN (0, 1))
);";

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub done: bool,
}

/// Row could not be read as a `Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowError {
    pub column: &'static str,
    pub reason: String,
}

impl Display for TaskRowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tasks.{}: {}", self.column, self.reason)
    }
}

impl Error for TaskRowError {}

impl Task {
    /// Reads a task from a `SELECT *` row of `TASKS_TABLE`.
    pub fn from_row(row: &Row) -> Result<Self, TaskRowError> {
        let id = match row.get(ID_COLUMN) {
            Some(Value::Integer(id)) => *id,
            other => return Err(unexpected(ID_COLUMN, other)),
        };
        let done = match row.get("done") {
            Some(Value::Integer(0)) => false,
            Some(Value::Integer(1)) => true,
            other => return Err(unexpected("done", other)),
        };

        Ok(Self {
            id,
            title: text_column(row, "title")?,
            description: text_column(row, "description")?,
            done,
        })
    }

    /// Write model for this task's fields, without `id`.
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("title", self.title.clone())
            .with("description", self.description.clone())
            .with("done", self.done)
    }
}

/// The tasks the store is seeded with when empty.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Buy groceries".to_string(),
            description: "Milk, Cheese, Pizza, Fruit, Tylenol".to_string(),
            done: false,
        },
        Task {
            id: 2,
            title: "Learn Python".to_string(),
            description: "Need to find a good Python tutorial on the web".to_string(),
            done: false,
        },
    ]
}

fn text_column(row: &Row, column: &'static str) -> Result<String, TaskRowError> {
    match row.get(column) {
        Some(Value::Text(value)) => Ok(value.clone()),
        other => Err(unexpected(column, other)),
    }
}

fn unexpected(column: &'static str, value: Option<&Value>) -> TaskRowError {
    let reason = match value {
        None => "column missing".to_string(),
        Some(Value::Null) => "unexpected NULL".to_string(),
        Some(Value::Integer(value)) => format!("unexpected integer {value}"),
        Some(Value::Real(value)) => format!("unexpected real {value}"),
        Some(Value::Text(_)) => "unexpected text".to_string(),
        Some(Value::Blob(bytes)) => format!("unexpected blob of {} bytes", bytes.len()),
    };
    TaskRowError { column, reason }
}
