//! End-to-end workflow tests against the public store API.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use ntest::timeout;
use tempfile::tempdir;

use user_store::{NewUser, StoreConfig, StoreError, UserPatch, UserStore};

fn open_store(dir: &std::path::Path) -> UserStore {
    let config = StoreConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    };
    UserStore::open(&config).unwrap()
}

/// Full CRUD lifecycle: insert → read → partial update → delete
#[timeout(5000)]
#[test]
fn test_full_crud_lifecycle() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());

    let created = store
        .insert(NewUser::new("Zara Khan", "zara.khan@example.com"))
        .unwrap();
    assert_eq!(created.id, 1);

    let fetched = store.get_by_id(created.id).unwrap();
    assert_eq!(fetched, created);

    let renamed = store.update(created.id, UserPatch::name("X")).unwrap();
    assert_eq!(renamed.name, "X");
    assert_eq!(renamed.email, "zara.khan@example.com");

    let moved = store
        .update(created.id, UserPatch::email("zara@example.com"))
        .unwrap();
    assert_eq!(moved.name, "X");
    assert_eq!(moved.email, "zara@example.com");

    let removed = store.delete(created.id).unwrap();
    assert_eq!(removed, moved);
    assert_eq!(
        store.get_by_id(created.id),
        Err(StoreError::UserNotFound { id: created.id })
    );
    assert_eq!(
        store.delete(created.id),
        Err(StoreError::UserNotFound { id: created.id })
    );
    assert!(store.list_all().unwrap().is_empty());
}

/// Rejected writes leave the store exactly as it was.
#[timeout(5000)]
#[test]
fn test_duplicate_email_leaves_state_unchanged() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());

    store
        .insert(NewUser::new("Aarav Kumar", "aarav.kumar@example.com"))
        .unwrap();
    store
        .insert(NewUser::new("Priya Sharma", "priya.sharma@example.com"))
        .unwrap();
    let before = store.list_all().unwrap();

    let err = store
        .insert(NewUser::new("Impostor", "aarav.kumar@example.com"))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::DuplicateEmail {
            email: "aarav.kumar@example.com".to_string()
        }
    );

    let err = store
        .update(
            2,
            UserPatch {
                name: Some("Renamed".to_string()),
                email: Some("aarav.kumar@example.com".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail { .. }));

    assert_eq!(store.list_all().unwrap(), before);

    // Nothing was flushed either
    drop(store);
    let reopened = open_store(temp_dir.path());
    assert_eq!(reopened.list_all().unwrap(), before);
}

/// Many threads racing for the same emails: exactly one winner per email.
#[timeout(10000)]
#[test]
fn test_concurrent_inserts_keep_emails_unique() {
    let temp_dir = tempdir().unwrap();
    let store = Arc::new(open_store(temp_dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut created = 0;
                for i in 0..10 {
                    let email = format!("user{}@example.com", i);
                    match store.insert(NewUser::new(format!("Worker {}", worker), email)) {
                        Ok(_) => created += 1,
                        Err(StoreError::DuplicateEmail { .. }) => {}
                        Err(e) => panic!("Unexpected error: {}", e),
                    }
                }
                created
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 10);

    let users = store.list_all().unwrap();
    assert_eq!(users.len(), 10);
    let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails.len(), 10);
    let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}
