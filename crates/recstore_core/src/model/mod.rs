//! Data shapes moved in and out of a record store.
//!
//! # Responsibility
//! - `Record`: sorted column/value pairs for writes.
//! - `Row`: ordered column/value pairs produced by reads.
//! - `Task`: typed projection of the `tasks` table.

pub mod record;
pub mod row;
pub mod task;
