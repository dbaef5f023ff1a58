//! Persistence layer.
//!
//! # Responsibility
//! - Own the single-table CRUD wrapper (`RecordStore`) and its lazy query
//!   cursor.
//! - Keep SQL text generation in one place (`sql`).
//!
//! # Invariants
//! - Values are always bound as parameters; only validated identifiers are
//!   formatted into SQL.

pub mod record_store;
mod sql;
