//! Persistence integration tests.
//!
//! Tests:
//! - Data and id sequence survive reopen
//! - A failed flush publishes nothing
//! - Corrupted data files refuse to open

use std::fs;

use ntest::timeout;
use tempfile::tempdir;

use user_store::{NewUser, StoreConfig, StoreError, UserPatch, UserStore};

fn config_for(dir: &std::path::Path) -> StoreConfig {
    StoreConfig {
        data_dir: dir.to_path_buf(),
        persistence_retry_delay_ms: 0,
        ..Default::default()
    }
}

#[timeout(5000)]
#[test]
fn test_reopen_preserves_users_and_sequence() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(temp_dir.path());

    {
        let store = UserStore::open(&config).unwrap();
        store
            .insert(NewUser::new("Rohan Patel", "rohan.patel@example.com"))
            .unwrap();
        store
            .insert(NewUser::new("Sneha Reddy", "sneha.reddy@example.com"))
            .unwrap();
        store.update(1, UserPatch::name("Rohan P")).unwrap();
        store.delete(2).unwrap();
    }

    let store = UserStore::open(&config).unwrap();
    let users = store.list_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Rohan P");

    // Deleted id 2 is not handed out again after restart
    let created = store
        .insert(NewUser::new("Sneha Reddy", "sneha.reddy@example.com"))
        .unwrap();
    assert_eq!(created.id, 3);
}

#[timeout(5000)]
#[test]
fn test_failed_flush_is_rolled_back() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(temp_dir.path());
    let store = UserStore::open(&config).unwrap();
    store
        .insert(NewUser::new("Vikram Singh", "vikram.singh@example.com"))
        .unwrap();

    // Replace the data file with a non-empty directory so the rename fails
    let data_path = config.data_file();
    fs::remove_file(&data_path).unwrap();
    fs::create_dir(&data_path).unwrap();
    fs::write(data_path.join("blocker"), b"x").unwrap();

    let err = store
        .insert(NewUser::new("Meera Iyer", "meera.iyer@example.com"))
        .unwrap_err();
    assert!(matches!(err, StoreError::IoError(_)), "got {:?}", err);

    let users = store.list_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "vikram.singh@example.com");
    assert_eq!(store.snapshot().next_id(), 2);
}

#[timeout(5000)]
#[test]
fn test_corrupted_file_refuses_to_open() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(temp_dir.path());
    {
        let store = UserStore::open(&config).unwrap();
        store
            .insert(NewUser::new("Priya Sharma", "priya.sharma@example.com"))
            .unwrap();
    }

    let contents = fs::read_to_string(config.data_file()).unwrap();
    fs::write(
        config.data_file(),
        contents.replace("priya.sharma@example.com", "someone@example.com"),
    )
    .unwrap();

    assert!(matches!(
        UserStore::open(&config),
        Err(StoreError::DataCorruption(_))
    ));
}
