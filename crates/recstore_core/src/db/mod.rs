//! SQLite connection bootstrap and identifier safety.
//!
//! # Responsibility
//! - Describe where a store connects to (`ConnectionTarget`).
//! - Open and configure SQLite connections (`OpenOptions`).
//! - Validate identifiers that must be interpolated into SQL text.
//!
//! # Invariants
//! - `:memory:` is the only reserved target string; everything else is a path.
//! - Only identifiers accepted by `validate_identifier` reach generated SQL.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod ident;
mod open;

pub use ident::{quote_identifier, validate_identifier};
pub use open::open_connection;

/// Reserved connection target string for a transient in-memory database.
pub const MEMORY_TARGET: &str = ":memory:";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidTableName(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidTableName(name) => write!(
                f,
                "invalid table name `{name}`; expected letters, digits and underscores"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidTableName(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Database a store connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// SQLite database file, created on first open.
    File(PathBuf),
    /// Transient database that disappears when the connection closes.
    Memory,
}

impl ConnectionTarget {
    /// Parses a target string, treating `:memory:` as the in-memory marker.
    pub fn parse(value: &str) -> Self {
        if value == MEMORY_TARGET {
            Self::Memory
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Short label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for ConnectionTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(MEMORY_TARGET),
        }
    }
}

impl From<&str> for ConnectionTarget {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<&Path> for ConnectionTarget {
    fn from(value: &Path) -> Self {
        Self::File(value.to_path_buf())
    }
}

impl From<PathBuf> for ConnectionTarget {
    fn from(value: PathBuf) -> Self {
        Self::File(value)
    }
}

/// Connection settings applied once during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Enables `PRAGMA foreign_keys`.
    pub foreign_keys: bool,
    /// SQLite busy handler timeout. `None` keeps the driver default.
    pub busy_timeout: Option<Duration>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            busy_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionTarget;
    use std::path::PathBuf;

    #[test]
    fn memory_marker_parses_to_memory_target() {
        assert_eq!(ConnectionTarget::parse(":memory:"), ConnectionTarget::Memory);
        assert_eq!(ConnectionTarget::Memory.to_string(), ":memory:");
    }

    #[test]
    fn other_strings_parse_to_file_targets() {
        assert_eq!(
            ConnectionTarget::parse("data/foo.db"),
            ConnectionTarget::File(PathBuf::from("data/foo.db"))
        );
        assert_eq!(ConnectionTarget::parse("memory").mode(), "file");
    }
}
