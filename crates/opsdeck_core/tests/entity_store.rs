use opsdeck_core::{
    Document, EntityKind, EntityRepository, EntityService, EntityStore, StoreError, Task,
    TaskPriority, TaskStatus,
};
use serde_json::{json, Value};

fn task_doc(id: &str, status: &str, assignee: Option<&str>) -> Document {
    let mut value = json!({
        "id": id,
        "title": format!("task {id}"),
        "description": "something to do",
        "priority": "medium",
        "status": status,
        "tags": ["ops", "infra"],
        "project": "API",
        "createdAt": 1_000,
        "updatedAt": 1_000,
    });
    if let Some(assignee) = assignee {
        value["assignee"] = json!(assignee);
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn insert_then_get_returns_equal_document() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    let doc = task_doc("t-1", "backlog", Some("Alice"));
    let stored = repo.insert(EntityKind::Tasks, doc.clone()).unwrap();
    assert_eq!(stored, doc);

    let loaded = repo.get_by_id(EntityKind::Tasks, "t-1").unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded["tags"], json!(["ops", "infra"]));
}

#[test]
fn insert_without_id_assigns_one() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    let mut doc = task_doc("ignored", "today", None);
    doc.remove("id");
    let stored = repo.insert(EntityKind::Tasks, doc).unwrap();
    let id = stored["id"].as_str().unwrap();

    assert!(!id.is_empty());
    assert_eq!(repo.get_by_id(EntityKind::Tasks, id).unwrap(), stored);
}

#[test]
fn duplicate_id_is_a_conflict_and_leaves_store_unchanged() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    let original = task_doc("t-1", "backlog", Some("Alice"));
    repo.insert(EntityKind::Tasks, original.clone()).unwrap();

    let err = repo
        .insert(EntityKind::Tasks, task_doc("t-1", "done", Some("Bob")))
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { kind: EntityKind::Tasks, ref id } if id == "t-1"));

    assert_eq!(repo.count(EntityKind::Tasks).unwrap(), 1);
    assert_eq!(repo.get_by_id(EntityKind::Tasks, "t-1").unwrap(), original);
    assert!(repo
        .query_by_index(EntityKind::Tasks, "by_status", &json!("done"))
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_document_is_rejected_before_persistence() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    let err = repo
        .insert(EntityKind::Tasks, task_doc("t-1", "archived", None))
        .unwrap_err();
    match err {
        StoreError::Validation(err) => assert_eq!(err.field, "status"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.count(EntityKind::Tasks).unwrap(), 0);
}

#[test]
fn same_id_in_different_kinds_does_not_conflict() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    repo.insert(EntityKind::Tasks, task_doc("1", "backlog", None))
        .unwrap();
    let contact = json!({
        "id": "1",
        "name": "Sarah Johnson",
        "company": "TechCorp Inc.",
        "email": "sarah@techcorp.com",
        "status": "prospect",
        "value": 25000,
        "lastContact": "2 days ago",
        "nextAction": "Follow-up email",
        "tags": [],
        "location": "San Francisco, CA",
        "createdAt": 1_000,
    });
    let Value::Object(contact) = contact else {
        unreachable!()
    };
    repo.insert(EntityKind::Contacts, contact).unwrap();

    assert_eq!(repo.count(EntityKind::Tasks).unwrap(), 1);
    assert_eq!(repo.count(EntityKind::Contacts).unwrap(), 1);
}

#[test]
fn get_by_unknown_id_is_not_found() {
    let store = EntityStore::open_in_memory().unwrap();
    let err = store
        .repo()
        .get_by_id(EntityKind::Tasks, "missing")
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn index_query_returns_exact_subset_in_insertion_order() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    for (id, status) in [
        ("a", "review"),
        ("b", "done"),
        ("c", "review"),
        ("d", "today"),
        ("e", "review"),
    ] {
        repo.insert(EntityKind::Tasks, task_doc(id, status, None))
            .unwrap();
    }

    let ids = repo
        .query_by_index(EntityKind::Tasks, "by_status", &json!("review"))
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "c", "e"]);

    let listed = repo
        .list(EntityKind::Tasks)
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(listed, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn index_query_with_null_matches_absent_field() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();

    repo.insert(EntityKind::Tasks, task_doc("a", "today", Some("Bob")))
        .unwrap();
    repo.insert(EntityKind::Tasks, task_doc("b", "today", None))
        .unwrap();

    let unassigned = repo
        .query_by_index(EntityKind::Tasks, "by_assignee", &Value::Null)
        .unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0]["id"], json!("b"));
}

#[test]
fn unknown_index_is_a_validation_error() {
    let store = EntityStore::open_in_memory().unwrap();
    let err = store
        .repo()
        .query_by_index(EntityKind::Tasks, "by_color", &json!("red"))
        .unwrap_err();
    match err {
        StoreError::Validation(err) => assert_eq!(err.field, "index"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_replaces_document_and_moves_index_entry() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();
    repo.insert(EntityKind::Tasks, task_doc("t-1", "today", None))
        .unwrap();

    let mut replacement = task_doc("t-1", "done", Some("Grace"));
    replacement.insert("updatedAt".to_string(), json!(2_000));
    repo.update(EntityKind::Tasks, "t-1", replacement.clone())
        .unwrap();

    assert_eq!(repo.get_by_id(EntityKind::Tasks, "t-1").unwrap(), replacement);
    assert!(repo
        .query_by_index(EntityKind::Tasks, "by_status", &json!("today"))
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.query_by_index(EntityKind::Tasks, "by_status", &json!("done"))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn update_rejects_changed_created_at_and_backwards_updated_at() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();
    let mut original = task_doc("t-1", "today", None);
    original.insert("updatedAt".to_string(), json!(5_000));
    repo.insert(EntityKind::Tasks, original.clone()).unwrap();

    let mut moved_created = original.clone();
    moved_created.insert("createdAt".to_string(), json!(500));
    moved_created.insert("updatedAt".to_string(), json!(6_000));
    let err = repo
        .update(EntityKind::Tasks, "t-1", moved_created)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref err) if err.field == "createdAt"));

    let mut rewound = original.clone();
    rewound.insert("updatedAt".to_string(), json!(4_000));
    let err = repo.update(EntityKind::Tasks, "t-1", rewound).unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref err) if err.field == "updatedAt"));

    assert_eq!(repo.get_by_id(EntityKind::Tasks, "t-1").unwrap(), original);
}

#[test]
fn update_of_missing_record_is_not_found() {
    let store = EntityStore::open_in_memory().unwrap();
    let err = store
        .repo()
        .update(EntityKind::Tasks, "ghost", task_doc("ghost", "today", None))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn update_with_mismatched_body_id_is_rejected() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();
    repo.insert(EntityKind::Tasks, task_doc("t-1", "today", None))
        .unwrap();

    let err = repo
        .update(EntityKind::Tasks, "t-1", task_doc("t-2", "today", None))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref err) if err.field == "id"));
}

#[test]
fn remove_deletes_record_and_index_entries() {
    let store = EntityStore::open_in_memory().unwrap();
    let repo = store.repo();
    repo.insert(EntityKind::Tasks, task_doc("t-1", "review", None))
        .unwrap();

    repo.remove(EntityKind::Tasks, "t-1").unwrap();

    assert_eq!(repo.count(EntityKind::Tasks).unwrap(), 0);
    assert!(repo
        .query_by_index(EntityKind::Tasks, "by_status", &json!("review"))
        .unwrap()
        .is_empty());
    let err = repo.remove(EntityKind::Tasks, "t-1").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn reset_empties_every_kind_and_allows_reuse_of_ids() {
    let mut store = EntityStore::open_in_memory().unwrap();
    store
        .repo()
        .insert(EntityKind::Tasks, task_doc("t-1", "today", None))
        .unwrap();

    store.reset().unwrap();

    for kind in EntityKind::ALL {
        assert_eq!(store.repo().count(kind).unwrap(), 0);
    }
    store
        .repo()
        .insert(EntityKind::Tasks, task_doc("t-1", "today", None))
        .unwrap();
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opsdeck.db");

    {
        let store = EntityStore::open(&path).unwrap();
        store
            .repo()
            .insert(EntityKind::Tasks, task_doc("t-1", "today", Some("Bob")))
            .unwrap();
    }

    let store = EntityStore::open(&path).unwrap();
    let loaded = store.repo().get_by_id(EntityKind::Tasks, "t-1").unwrap();
    assert_eq!(loaded["assignee"], json!("Bob"));
    assert!(store.ping().is_ok());
}

#[test]
fn service_stamps_timestamps_on_create_and_replace() {
    let store = EntityStore::open_in_memory().unwrap();
    let service = EntityService::new(store.repo());

    let mut doc = task_doc("t-1", "backlog", None);
    doc.remove("createdAt");
    doc.remove("updatedAt");
    let created = service
        .create_with_defaults(EntityKind::Tasks, doc, 10_000)
        .unwrap();
    assert_eq!(created["createdAt"], json!(10_000));
    assert_eq!(created["updatedAt"], json!(10_000));

    let mut replacement = task_doc("t-1", "in-progress", Some("Diana"));
    replacement.remove("createdAt");
    replacement.remove("updatedAt");
    let replaced = service
        .replace_with_defaults(EntityKind::Tasks, "t-1", replacement, 20_000)
        .unwrap();
    assert_eq!(replaced["createdAt"], json!(10_000));
    assert_eq!(replaced["updatedAt"], json!(20_000));

    let typed: Task = service.get_record("t-1").unwrap();
    assert_eq!(typed.status, TaskStatus::InProgress);
    assert_eq!(typed.priority, TaskPriority::Medium);
    assert_eq!(typed.assignee.as_deref(), Some("Diana"));
}

#[test]
fn replace_with_stale_clock_keeps_updated_at_monotonic() {
    let store = EntityStore::open_in_memory().unwrap();
    let service = EntityService::new(store.repo());
    let mut doc = task_doc("t-1", "today", None);
    doc.insert("updatedAt".to_string(), json!(50_000));
    service.insert(EntityKind::Tasks, doc.clone()).unwrap();

    let replaced = service
        .replace_with_defaults(EntityKind::Tasks, "t-1", doc, 40_000)
        .unwrap();
    assert_eq!(replaced["updatedAt"], json!(50_000));
}

#[test]
fn typed_records_round_trip_through_service() {
    let store = EntityStore::open_in_memory().unwrap();
    let service = EntityService::new(store.repo());

    let task = Task {
        id: "typed".to_string(),
        title: "Rotate keys".to_string(),
        description: "Quarterly credential rotation".to_string(),
        priority: TaskPriority::High,
        status: TaskStatus::Review,
        assignee: None,
        due_date: Some("2025-03-01".to_string()),
        tags: vec!["security".to_string()],
        project: "Ops".to_string(),
        created_at: 1,
        updated_at: 2,
    };
    let stored = service.insert_record(&task).unwrap();
    assert_eq!(stored, task);

    let by_due = service
        .query_records::<Task>("by_due_date", &json!("2025-03-01"))
        .unwrap();
    assert_eq!(by_due, vec![task.clone()]);
    assert_eq!(service.list_records::<Task>().unwrap(), vec![task]);
}
