//! Query result row.
//!
//! # Responsibility
//! - Hold one materialized result row detached from the SQLite cursor.
//! - Serialize as a JSON-style object in result column order.
//!
//! # Invariants
//! - `columns.len() == values.len()`.
//! - Column order matches the statement's result columns.

use crate::model::record::{Record, ID_COLUMN};
use rusqlite::types::Value;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::sync::Arc;

/// Ordered column-to-value mapping produced by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    #[cfg(test)]
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        assert_eq!(columns.len(), values.len(), "one value per column");
        Self { columns, values }
    }

    pub(crate) fn from_sqlite(columns: &Arc<[String]>, row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            values.push(row.get::<_, Value>(index)?);
        }
        Ok(Self {
            columns: Arc::clone(columns),
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a value by column name.
    ///
    /// Exact matches win; otherwise falls back to an ASCII case-insensitive
    /// match, as SQLite column names are case-insensitive.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|index| &self.values[index])
    }

    /// Looks up a value by result position.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Integer `id` column, when present.
    pub fn id(&self) -> Option<i64> {
        match self.get(ID_COLUMN) {
            Some(Value::Integer(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Converts into a write model, e.g. to copy a row elsewhere.
    pub fn into_record(self) -> Record {
        self.columns
            .iter()
            .cloned()
            .zip(self.values)
            .collect()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|name| name.eq_ignore_ascii_case(column))
            })
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &SqlValue(value))?;
        }
        map.end()
    }
}

struct SqlValue<'a>(&'a Value);

impl Serialize for SqlValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_none(),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Real(value) => serializer.serialize_f64(*value),
            Value::Text(value) => serializer.serialize_str(value),
            Value::Blob(value) => serializer.serialize_bytes(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Row;
    use rusqlite::types::Value;
    use std::sync::Arc;

    fn sample() -> Row {
        let columns: Arc<[String]> = Arc::from(vec!["id".to_string(), "String".to_string()]);
        Row::new(columns, vec![Value::Integer(2), Value::Text("TWO".to_string())])
    }

    #[test]
    fn lookup_prefers_exact_then_case_insensitive() {
        let row = sample();
        assert_eq!(row.get("String"), Some(&Value::Text("TWO".to_string())));
        assert_eq!(row.get("string"), Some(&Value::Text("TWO".to_string())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.id(), Some(2));
    }

    #[test]
    fn into_record_keeps_all_columns() {
        let record = sample().into_record();
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["String", "id"]);
    }
}
