//! Seed data tests.

use tempfile::tempdir;

use user_store::seed::{seed_if_empty, SAMPLE_USERS};
use user_store::{NewUser, StoreConfig, UserStore};

#[test]
fn test_seed_inserts_samples_in_order() {
    let store = UserStore::in_memory();

    assert_eq!(seed_if_empty(&store).unwrap(), 6);

    let users = store.list_all().unwrap();
    assert_eq!(users.len(), SAMPLE_USERS.len());
    for (i, (user, (name, email))) in users.iter().zip(SAMPLE_USERS.iter()).enumerate() {
        assert_eq!(user.id, i as u64 + 1);
        assert_eq!(user.name, *name);
        assert_eq!(user.email, *email);
    }
}

#[test]
fn test_seed_twice_is_a_noop() {
    let store = UserStore::in_memory();
    seed_if_empty(&store).unwrap();

    assert_eq!(seed_if_empty(&store).unwrap(), 0);
    assert_eq!(store.list_all().unwrap().len(), 6);
}

#[test]
fn test_seed_skips_non_empty_store() {
    let store = UserStore::in_memory();
    store
        .insert(NewUser::new("Zara Khan", "zara.khan@example.com"))
        .unwrap();

    assert_eq!(seed_if_empty(&store).unwrap(), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_seed_survives_restart_without_duplicating() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = StoreConfig {
        data_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };

    let store = UserStore::open(&config)?;
    assert_eq!(seed_if_empty(&store)?, 6);
    drop(store);

    let store = UserStore::open(&config)?;
    assert_eq!(seed_if_empty(&store)?, 0);
    assert_eq!(store.list_all()?.len(), 6);
    Ok(())
}
