//! SQL text builders for table-scoped statements.
//!
//! Identifiers are quoted here; values are never interpolated and always
//! travel as numbered bind parameters.

use crate::db::quote_identifier;
use crate::model::record::ID_COLUMN;

pub(crate) fn select_by_id(table: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = ?1",
        quote_identifier(table),
        ID_COLUMN
    )
}

pub(crate) fn select_all(table: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}

pub(crate) fn count_all(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_identifier(table))
}

pub(crate) fn delete_by_id(table: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?1",
        quote_identifier(table),
        ID_COLUMN
    )
}

/// `INSERT` with one placeholder per column, in the given order.
///
/// No columns falls back to `DEFAULT VALUES`.
pub(crate) fn insert(table: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(table));
    }

    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
        quote_identifier(table)
    )
}

/// `UPDATE ... SET` over `columns`; the id placeholder comes last.
pub(crate) fn update_by_id(table: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{} = ?{}", quote_identifier(column), index + 1))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "UPDATE {} SET {assignments} WHERE {} = ?{}",
        quote_identifier(table),
        ID_COLUMN,
        columns.len() + 1
    )
}

pub(crate) fn table_columns() -> &'static str {
    "SELECT name FROM pragma_table_info(?1) ORDER BY cid"
}
