//! Use-case services built on the record store.
//!
//! # Responsibility
//! - Give typed APIs to callers that should not handle raw rows.

pub mod task_service;
