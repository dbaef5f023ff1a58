//! SQL identifier checks.
//!
//! Table names are interpolated into SQL text, so they are restricted to
//! plain identifiers before any statement is built.

use super::{DbError, DbResult};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`, rejecting everything else.
pub fn validate_identifier(name: &str) -> DbResult<&str> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(name)
    } else {
        Err(DbError::InvalidTableName(name.to_string()))
    }
}

/// Wraps an identifier in double quotes, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::{quote_identifier, validate_identifier};
    use crate::db::DbError;

    #[test]
    fn plain_identifiers_are_accepted() {
        for name in ["foo", "_tasks", "Table2", "a_b_c"] {
            assert_eq!(validate_identifier(name).unwrap(), name);
        }
    }

    #[test]
    fn injection_shaped_names_are_rejected() {
        for name in ["", "2fast", "foo bar", "foo;DROP TABLE x", "\"foo\"", "foo-bar"] {
            let err = validate_identifier(name).unwrap_err();
            assert!(matches!(err, DbError::InvalidTableName(ref value) if value == name));
        }
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_identifier("string"), "\"string\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
