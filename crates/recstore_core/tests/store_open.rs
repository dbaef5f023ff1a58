use recstore_core::{ConnectionTarget, DbError, OpenOptions, Record, RecordStore, RepoError};
use std::time::Duration;

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo.db");

    let store = RecordStore::open(path.as_path(), "foo").unwrap();
    assert_eq!(store.target(), &ConnectionTarget::File(path.clone()));
    store
        .execute_statement("CREATE TABLE foo (id INTEGER PRIMARY KEY, string TEXT)", &[])
        .unwrap();
    let id = store
        .insert(&Record::new().with("string", "kept".to_string()))
        .unwrap();
    store.close().unwrap();

    let reopened = RecordStore::open(path.as_path(), "foo").unwrap();
    let row = reopened.get_by_id(id).unwrap().unwrap();
    assert_eq!(row.id(), Some(id));
    assert_eq!(reopened.count_all().unwrap(), 1);
}

#[test]
fn memory_target_is_private_to_each_store() {
    let first = RecordStore::open(":memory:", "foo").unwrap();
    first
        .execute_statement("CREATE TABLE foo (id INTEGER PRIMARY KEY)", &[])
        .unwrap();

    let second = RecordStore::open(":memory:", "foo").unwrap();
    assert_eq!(second.target(), &ConnectionTarget::Memory);
    assert!(matches!(second.count_all(), Err(RepoError::Db(_))));
}

#[test]
fn unopenable_path_fails_with_driver_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("foo.db");

    let result = RecordStore::open(path.as_path(), "foo");
    assert!(matches!(result, Err(RepoError::Db(DbError::Sqlite(_)))));
}

#[test]
fn table_name_must_be_plain_identifier() {
    for name in ["foo; DROP TABLE foo", "", "1abc", "foo bar"] {
        let result = RecordStore::open(":memory:", name);
        assert!(
            matches!(result, Err(RepoError::Db(DbError::InvalidTableName(ref value))) if value == name),
            "table name {name:?}"
        );
    }
}

#[test]
fn open_options_are_applied() {
    let options = OpenOptions {
        foreign_keys: false,
        busy_timeout: Some(Duration::from_millis(250)),
    };
    let store = RecordStore::open_with(":memory:", "foo", &options).unwrap();

    let enabled = store
        .execute_query_value("PRAGMA foreign_keys", &[])
        .unwrap();
    assert_eq!(enabled, recstore_core::Value::Integer(0));

    let defaults = RecordStore::open(":memory:", "foo").unwrap();
    let enabled = defaults
        .execute_query_value("PRAGMA foreign_keys", &[])
        .unwrap();
    assert_eq!(enabled, recstore_core::Value::Integer(1));
}

#[test]
fn table_name_is_fixed_at_construction() {
    let store = RecordStore::open(":memory:", "Tasks_2").unwrap();
    assert_eq!(store.table_name(), "Tasks_2");
}
