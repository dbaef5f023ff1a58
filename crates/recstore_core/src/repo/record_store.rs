//! Table-scoped record store over one SQLite connection.
//!
//! # Responsibility
//! - Translate generic record operations into parameterized SQL against the
//!   single table bound at construction.
//! - Expose raw-SQL passthrough for statements the CRUD surface does not cover.
//!
//! # Invariants
//! - The store exclusively owns its connection; `close` consumes the store, so
//!   no operation can run on a released connection.
//! - Every write runs in SQLite auto-commit mode and is durable once the call
//!   returns. There is no cross-call atomicity.
//! - Record keys are checked against the table's columns before any write
//!   statement is prepared.
//! - The store is `Send` but not `Sync`: concurrent callers must serialize
//!   access themselves (one store per thread, or a mutex around it).

use crate::db::{open_connection, validate_identifier, ConnectionTarget, DbError, OpenOptions};
use crate::model::record::Record;
use crate::model::row::Row;
use crate::repo::sql;
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Statement};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surfaced by record store operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    MissingTable(String),
    UnknownColumn { table: String, column: String },
    /// Two record keys name the same column, differing only in case.
    DuplicateColumn { table: String, column: String },
    EmptyUpdate { table: String },
    /// A single-row or single-value accessor matched nothing.
    NoRows,
    /// A query's cursor was already iterated once.
    CursorConsumed,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingTable(table) => write!(f, "table does not exist: {table}"),
            Self::UnknownColumn { table, column } => {
                write!(f, "unknown column `{column}` for table `{table}`")
            }
            Self::DuplicateColumn { table, column } => write!(
                f,
                "column `{column}` of table `{table}` is set more than once"
            ),
            Self::EmptyUpdate { table } => {
                write!(f, "update on `{table}` has no columns to set")
            }
            Self::NoRows => write!(f, "query returned no rows"),
            Self::CursorConsumed => write!(f, "query rows were already consumed"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingTable(_)
            | Self::UnknownColumn { .. }
            | Self::DuplicateColumn { .. }
            | Self::EmptyUpdate { .. }
            | Self::NoRows
            | Self::CursorConsumed
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Self::NoRows,
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// CRUD wrapper bound to one table and one connection.
///
/// Generated SQL lists columns in the record's lexicographic key order.
pub struct RecordStore {
    conn: Connection,
    target: ConnectionTarget,
    table: String,
}

impl RecordStore {
    /// Opens `target` with default options and binds `table`.
    pub fn open(target: impl Into<ConnectionTarget>, table: &str) -> RepoResult<Self> {
        Self::open_with(target, table, &OpenOptions::default())
    }

    /// Opens `target` with explicit connection options and binds `table`.
    ///
    /// The table does not need to exist yet; it is looked up on each write.
    ///
    /// # Errors
    /// - `DbError::InvalidTableName` when `table` is not a plain identifier.
    /// - `DbError::Sqlite` when the connection cannot be opened or configured.
    pub fn open_with(
        target: impl Into<ConnectionTarget>,
        table: &str,
        options: &OpenOptions,
    ) -> RepoResult<Self> {
        let target = target.into();
        let table = validate_identifier(table)?.to_string();
        let conn = open_connection(&target, options)?;
        info!(
            "event=store_open module=repo status=ok mode={} table={}",
            target.mode(),
            table
        );
        Ok(Self {
            conn,
            target,
            table,
        })
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Runs one non-query statement and commits it.
    pub fn execute_statement(&self, sql: &str, params: &[Value]) -> RepoResult<()> {
        let changed = self.conn.execute(sql, params_from_iter(params.iter()))?;
        debug!(
            "event=sql_execute module=repo status=ok table={} params={} changed={}",
            self.table,
            params.len(),
            changed
        );
        Ok(())
    }

    /// Prepares a query and binds `params`; rows are produced lazily by
    /// `Query::rows`.
    pub fn execute_query(&self, sql: &str, params: &[Value]) -> RepoResult<Query<'_>> {
        let stmt = self.conn.prepare(sql)?;
        Query::bind(stmt, params)
    }

    /// First column of the first row.
    ///
    /// Same contract as `execute_query_value`; kept for callers that think of
    /// the result as a one-row lookup.
    ///
    /// # Errors
    /// - `RepoError::NoRows` when the query matches nothing. Callers must
    ///   guarantee a row exists or handle this error.
    pub fn execute_query_row(&self, sql: &str, params: &[Value]) -> RepoResult<Value> {
        self.execute_query_value(sql, params)
    }

    /// First column of the first row.
    ///
    /// # Errors
    /// - `RepoError::NoRows` when the query matches nothing.
    pub fn execute_query_value(&self, sql: &str, params: &[Value]) -> RepoResult<Value> {
        let value = self
            .conn
            .query_row(sql, params_from_iter(params.iter()), |row| {
                row.get::<_, Value>(0)
            })?;
        Ok(value)
    }

    /// Whole first row of a query.
    ///
    /// # Errors
    /// - `RepoError::NoRows` when the query matches nothing.
    pub fn query_first_row(&self, sql: &str, params: &[Value]) -> RepoResult<Row> {
        let mut query = self.execute_query(sql, params)?;
        let first = query.rows()?.next().transpose()?;
        first.ok_or(RepoError::NoRows)
    }

    /// Row with the given `id`, or `None` when no row matches.
    pub fn get_by_id(&self, id: i64) -> RepoResult<Option<Row>> {
        let mut query = self.execute_query(&sql::select_by_id(&self.table), &[Value::Integer(id)])?;
        let row = query.rows()?.next().transpose()?;
        Ok(row)
    }

    /// Every row of the bound table, in SQLite's natural scan order.
    pub fn get_all(&self) -> RepoResult<Query<'_>> {
        self.execute_query(&sql::select_all(&self.table), &[])
    }

    /// `get_all`, collected.
    pub fn load_all(&self) -> RepoResult<Vec<Row>> {
        self.get_all()?.collect_rows()
    }

    /// Inserts `record` and returns the row id SQLite assigned.
    ///
    /// # Errors
    /// - `RepoError::MissingTable` / `RepoError::UnknownColumn` when the
    ///   record does not fit the table.
    /// - `RepoError::Db` for constraint violations and other driver errors.
    pub fn insert(&self, record: &Record) -> RepoResult<i64> {
        self.check_columns(record.columns())?;

        let columns: Vec<&str> = record.columns().collect();
        let sql = sql::insert(&self.table, &columns);
        self.conn
            .execute(&sql, params_from_iter(record.iter().map(|(_, value)| value)))?;
        let id = self.conn.last_insert_rowid();

        debug!(
            "event=record_insert module=repo status=ok table={} id={} columns={}",
            self.table,
            id,
            columns.len()
        );
        Ok(id)
    }

    /// Overwrites the columns present in `record` on row `id`.
    ///
    /// An `id` key in `record` is ignored. Updating a missing row is not an
    /// error.
    ///
    /// # Errors
    /// - `RepoError::EmptyUpdate` when nothing but `id` was supplied.
    /// - `RepoError::MissingTable` / `RepoError::UnknownColumn` as for `insert`.
    pub fn update(&self, id: i64, record: &Record) -> RepoResult<()> {
        let (columns, mut values): (Vec<&str>, Vec<&Value>) = record.update_fields().unzip();
        if columns.is_empty() {
            return Err(RepoError::EmptyUpdate {
                table: self.table.clone(),
            });
        }
        self.check_columns(columns.iter().copied())?;

        let id_value = Value::Integer(id);
        values.push(&id_value);
        let changed = self.conn.execute(
            &sql::update_by_id(&self.table, &columns),
            params_from_iter(values),
        )?;

        debug!(
            "event=record_update module=repo status=ok table={} id={} columns={} changed={}",
            self.table,
            id,
            columns.len(),
            changed
        );
        Ok(())
    }

    /// Deletes row `id`. Succeeds whether or not the row existed.
    pub fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&sql::delete_by_id(&self.table), [id])?;
        debug!(
            "event=record_delete module=repo status=ok table={} id={} changed={}",
            self.table, id, changed
        );
        Ok(())
    }

    pub fn count_all(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row(&sql::count_all(&self.table), [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }

    /// Releases the connection.
    ///
    /// Dropping the store also closes it, but only `close` reports errors.
    pub fn close(self) -> RepoResult<()> {
        let table = self.table;
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_close module=repo status=ok table={table}");
                Ok(())
            }
            Err((_conn, err)) => {
                warn!("event=store_close module=repo status=error table={table} error={err}");
                Err(err.into())
            }
        }
    }

    fn check_columns<'a>(&self, columns: impl Iterator<Item = &'a str>) -> RepoResult<()> {
        let known = self.table_columns()?;
        let mut used = vec![false; known.len()];
        for column in columns {
            let Some(index) = known
                .iter()
                .position(|name| name.eq_ignore_ascii_case(column))
            else {
                warn!(
                    "event=record_rejected module=repo status=error table={} error_code=unknown_column",
                    self.table
                );
                return Err(RepoError::UnknownColumn {
                    table: self.table.clone(),
                    column: column.to_string(),
                });
            };
            if std::mem::replace(&mut used[index], true) {
                warn!(
                    "event=record_rejected module=repo status=error table={} error_code=duplicate_column",
                    self.table
                );
                return Err(RepoError::DuplicateColumn {
                    table: self.table.clone(),
                    column: known[index].clone(),
                });
            }
        }
        Ok(())
    }

    fn table_columns(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql::table_columns())?;
        let names = stmt
            .query_map([self.table.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if names.is_empty() {
            return Err(RepoError::MissingTable(self.table.clone()));
        }
        Ok(names)
    }
}

/// Prepared query with its parameters bound.
///
/// Rows can be iterated exactly once; a second `rows` call fails with
/// `RepoError::CursorConsumed`.
pub struct Query<'conn> {
    stmt: Statement<'conn>,
    columns: Arc<[String]>,
    consumed: bool,
}

impl<'conn> Query<'conn> {
    fn bind(mut stmt: Statement<'conn>, params: &[Value]) -> RepoResult<Self> {
        let expected = stmt.parameter_count();
        if params.len() != expected {
            return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected).into());
        }
        for (index, value) in params.iter().enumerate() {
            stmt.raw_bind_parameter(index + 1, value)?;
        }

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        Ok(Self {
            stmt,
            columns,
            consumed: false,
        })
    }

    /// Result column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Starts the single pass over the result rows.
    pub fn rows(&mut self) -> RepoResult<RowIter<'_>> {
        if self.consumed {
            return Err(RepoError::CursorConsumed);
        }
        self.consumed = true;
        Ok(RowIter {
            rows: self.stmt.raw_query(),
            columns: Arc::clone(&self.columns),
            finished: false,
        })
    }

    /// Drains the query into memory.
    pub fn collect_rows(mut self) -> RepoResult<Vec<Row>> {
        // Bound so the cursor's borrow of `self` ends before `self` drops.
        let rows = self.rows()?.collect::<RepoResult<Vec<_>>>();
        rows
    }
}

/// Lazy cursor over a query's rows. Stops after the first error.
pub struct RowIter<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    columns: Arc<[String]>,
    finished: bool,
}

impl Iterator for RowIter<'_> {
    type Item = RepoResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.rows.next() {
            Ok(Some(row)) => Some(Row::from_sqlite(&self.columns, row).map_err(RepoError::from)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err.into()))
            }
        }
    }
}
