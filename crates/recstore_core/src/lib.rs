//! Table-scoped record storage over SQLite.
//!
//! A `RecordStore` owns one connection, is bound to one table, and turns
//! `Record` values into parameterized SQL. `TaskService` layers a typed task
//! list on top of a store bound to `tasks`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionTarget, DbError, OpenOptions, MEMORY_TARGET};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::record::{Record, ID_COLUMN};
pub use model::row::Row;
pub use model::task::{Task, TaskRowError, TASKS_TABLE};
pub use repo::record_store::{Query, RecordStore, RepoError, RepoResult, RowIter};
pub use rusqlite::types::Value;
pub use service::task_service::{TaskService, TasksEnvelope};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
