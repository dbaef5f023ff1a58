//! Task use-case service.
//!
//! # Responsibility
//! - Provide typed task CRUD on top of a `RecordStore` bound to `tasks`.
//! - Build the `{"tasks": [...]}` envelope served to list callers.
//!
//! # Invariants
//! - All reads and writes go through the store's CRUD surface; raw SQL is
//!   only used for schema setup.
//! - Seeding happens only into an empty table.

use crate::model::record::Record;
use crate::model::task::{default_tasks, Task, TaskRowError, TASKS_SCHEMA_SQL, TASKS_TABLE};
use crate::repo::record_store::{RecordStore, RepoError, RepoResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Serialized task list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksEnvelope {
    pub tasks: Vec<Task>,
}

/// Task operations over an owned store.
pub struct TaskService {
    store: RecordStore,
}

impl TaskService {
    /// Wraps a store bound to `tasks`.
    ///
    /// # Errors
    /// - `RepoError::InvalidData` when the store is bound to another table.
    pub fn new(store: RecordStore) -> RepoResult<Self> {
        if store.table_name() != TASKS_TABLE {
            return Err(RepoError::InvalidData(format!(
                "task service needs table `{TASKS_TABLE}`, store is bound to `{}`",
                store.table_name()
            )));
        }
        Ok(Self { store })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Creates the `tasks` table when missing.
    pub fn ensure_schema(&self) -> RepoResult<()> {
        self.store.execute_statement(TASKS_SCHEMA_SQL, &[])
    }

    /// Inserts the default tasks when the table is empty.
    ///
    /// Returns the number of tasks inserted.
    pub fn seed_defaults(&self) -> RepoResult<usize> {
        if self.store.count_all()? > 0 {
            return Ok(0);
        }

        let defaults = default_tasks();
        for task in &defaults {
            self.store.insert(&task.to_record())?;
        }
        info!(
            "event=tasks_seed module=service status=ok inserted={}",
            defaults.len()
        );
        Ok(defaults.len())
    }

    /// All tasks, in table scan order.
    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut query = self.store.get_all()?;
        let mut tasks = Vec::new();
        for row in query.rows()? {
            tasks.push(Task::from_row(&row?).map_err(invalid_task)?);
        }
        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> RepoResult<Option<Task>> {
        match self.store.get_by_id(id)? {
            Some(row) => Ok(Some(Task::from_row(&row).map_err(invalid_task)?)),
            None => Ok(None),
        }
    }

    /// Creates an open task and returns it with its assigned id.
    pub fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> RepoResult<Task> {
        let mut task = Task {
            id: 0,
            title: title.into(),
            description: description.into(),
            done: false,
        };
        task.id = self.store.insert(&task.to_record())?;
        Ok(task)
    }

    /// Sets the `done` flag on task `id`.
    pub fn set_done(&self, id: i64, done: bool) -> RepoResult<()> {
        self.store.update(id, &Record::new().with("done", done))
    }

    pub fn delete_task(&self, id: i64) -> RepoResult<()> {
        self.store.delete(id)
    }

    /// Task list wrapped for serialization.
    pub fn tasks_envelope(&self) -> RepoResult<TasksEnvelope> {
        Ok(TasksEnvelope {
            tasks: self.list_tasks()?,
        })
    }
}

fn invalid_task(err: TaskRowError) -> RepoError {
    RepoError::InvalidData(err.to_string())
}
