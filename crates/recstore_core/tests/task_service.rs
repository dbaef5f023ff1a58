use recstore_core::{Record, RecordStore, RepoError, Task, TaskService, Value, TASKS_TABLE};

fn service() -> TaskService {
    let store = RecordStore::open(":memory:", TASKS_TABLE).unwrap();
    let service = TaskService::new(store).unwrap();
    service.ensure_schema().unwrap();
    service
}

#[test]
fn seeding_inserts_defaults_once() {
    let service = service();

    assert_eq!(service.seed_defaults().unwrap(), 2);
    assert_eq!(service.seed_defaults().unwrap(), 0);

    let tasks = service.list_tasks().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 1);
    assert_eq!(tasks[0].title, "Buy groceries");
    assert_eq!(tasks[1].id, 2);
    assert_eq!(tasks[1].title, "Learn Python");
    assert!(tasks.iter().all(|task| !task.done));
}

#[test]
fn envelope_serializes_like_the_task_list_response() {
    let service = service();
    service.seed_defaults().unwrap();

    let json = serde_json::to_value(service.tasks_envelope().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "tasks": [
                {
                    "id": 1,
                    "title": "Buy groceries",
                    "description": "Milk, Cheese, Pizza, Fruit, Tylenol",
                    "done": false
                },
                {
                    "id": 2,
                    "title": "Learn Python",
                    "description": "Need to find a good Python tutorial on the web",
                    "done": false
                }
            ]
        })
    );
}

#[test]
fn create_toggle_and_delete_task() {
    let service = service();

    let task = service.create_task("Write tests", "cover the store").unwrap();
    assert_eq!(task.id, 1);

    service.set_done(task.id, true).unwrap();
    let loaded = service.get_task(task.id).unwrap().unwrap();
    assert_eq!(
        loaded,
        Task {
            done: true,
            ..task.clone()
        }
    );

    service.delete_task(task.id).unwrap();
    assert!(service.get_task(task.id).unwrap().is_none());
    assert!(service.list_tasks().unwrap().is_empty());
}

#[test]
fn malformed_rows_are_reported_as_invalid_data() {
    let service = service();
    service
        .store()
        .execute_statement(
            "INSERT INTO tasks (title, description) VALUES (?1, ?2)",
            &[Value::Blob(vec![1, 2]), Value::Text("binary title".to_string())],
        )
        .unwrap();

    let err = service.list_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("tasks.title")));
}

#[test]
fn service_requires_tasks_table() {
    let store = RecordStore::open(":memory:", "foo").unwrap();
    assert!(matches!(
        TaskService::new(store),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn rows_written_through_store_are_visible_as_tasks() {
    let service = service();
    let id = service
        .store()
        .insert(
            &Record::new()
                .with("title", "Raw".to_string())
                .with("description", "via store".to_string())
                .with("done", 1_i64),
        )
        .unwrap();

    let task = service.get_task(id).unwrap().unwrap();
    assert!(task.done);
    assert_eq!(task.description, "via store");
}
