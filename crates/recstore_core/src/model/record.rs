//! Record write model.
//!
//! # Responsibility
//! - Carry column/value pairs for insert and update calls.
//! - Fix the column order of generated SQL.
//!
//! # Invariants
//! - Columns are always iterated in lexicographic (byte-wise) key order,
//!   independent of insertion order.
//! - A key appears at most once.

use rusqlite::types::Value;
use std::collections::BTreeMap;

/// Name of the integer primary key column every store table carries.
pub const ID_COLUMN: &str = "id";

/// Column-name to value mapping for one row.
///
/// Keys are validated against the bound table's columns by the store, not
/// here. Omit `id` on insert to let SQLite assign one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets `column`, returning the value it replaced.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in SQL generation order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Column/value pairs in SQL generation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Column/value pairs for an `UPDATE ... SET` clause.
    ///
    /// The primary key column is skipped, matched case-insensitively like
    /// every SQLite column name, so an update can never rewrite a row's
    /// identity.
    pub fn update_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter()
            .filter(|(column, _)| !column.eq_ignore_ascii_case(ID_COLUMN))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::Record;
    use rusqlite::types::Value;

    #[test]
    fn columns_follow_lexicographic_order_not_insertion_order() {
        let record = Record::new()
            .with("title", "t".to_string())
            .with("done", 0_i64)
            .with("description", "d".to_string())
            .with("Zed", Value::Null);

        let columns: Vec<_> = record.columns().collect();
        assert_eq!(columns, vec!["Zed", "description", "done", "title"]);
    }

    #[test]
    fn update_fields_skip_id_in_any_case() {
        let record = Record::new()
            .with("id", 9_i64)
            .with("ID", 10_i64)
            .with("Id", 11_i64)
            .with("identity", "kept".to_string())
            .with("string", "TWO".to_string());

        let columns: Vec<_> = record.update_fields().map(|(column, _)| column).collect();
        assert_eq!(columns, vec!["identity", "string"]);
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut record = Record::new().with("string", "one".to_string());
        let previous = record.set("string", "uno".to_string());

        assert_eq!(previous, Some(Value::Text("one".to_string())));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("string"), Some(&Value::Text("uno".to_string())));
    }

    #[test]
    fn collects_from_pairs() {
        let record: Record = [("b", 2_i64), ("a", 1_i64)].into_iter().collect();
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(record.contains("a"));
        assert!(!record.is_empty());
    }
}
