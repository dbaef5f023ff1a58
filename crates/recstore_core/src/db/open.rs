//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply `OpenOptions` before the connection is handed out.
//!
//! # Invariants
//! - Returned connections are in auto-commit mode.
//! - Every open attempt emits exactly one terminal `db_open` event.

use super::{ConnectionTarget, DbResult, OpenOptions};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Opens a SQLite connection for `target` and applies `options`.
///
/// # Side effects
/// - Creates the database file when a missing file target is opened.
/// - Emits `db_open` logging events with duration and status.
pub fn open_connection(target: &ConnectionTarget, options: &OpenOptions) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match target {
        ConnectionTarget::File(path) => Connection::open(path),
        ConnectionTarget::Memory => Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = configure_connection(&conn, options) {
        error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code=db_configure_failed error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    info!(
        "event=db_open module=db status=ok mode={} duration_ms={}",
        mode,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure_connection(conn: &Connection, options: &OpenOptions) -> rusqlite::Result<()> {
    let pragma = if options.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {pragma};"))?;
    if let Some(timeout) = options.busy_timeout {
        conn.busy_timeout(timeout)?;
    }
    Ok(())
}
