//! Shared user store.
//!
//! Readers get an immutable snapshot of the table through `ArcSwap`.
//! Writers are serialized, work on a copy of the current snapshot, flush the
//! copy to disk and only then publish it, so a rejected or failed write never
//! becomes visible.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::persistence::PersistenceManager;
use crate::table::UserTable;
use crate::user::{NewUser, User, UserPatch};

/// User storage layer, constructed once and shared between request handlers.
#[derive(Debug)]
pub struct UserStore {
    /// Published table snapshot
    table: ArcSwap<UserTable>,
    /// Serializes writers
    write_lock: Mutex<()>,
    /// Durable backing file, absent for in-memory stores
    persistence: Option<PersistenceManager>,
}

impl UserStore {
    /// Opens the store backed by the data file in `config.data_dir`.
    ///
    /// # Returns
    /// `Result<UserStore, StoreError>`; corruption or I/O failures here are
    /// meant to be fatal to the caller.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let persistence = PersistenceManager::new(config);
        let table = persistence.load_table()?;
        tracing::info!(
            "Opened user store at {} ({} users)",
            persistence.data_path().display(),
            table.len()
        );

        Ok(Self {
            table: ArcSwap::from_pointee(table),
            write_lock: Mutex::new(()),
            persistence: Some(persistence),
        })
    }

    /// Creates a store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            table: ArcSwap::from_pointee(UserTable::new()),
            write_lock: Mutex::new(()),
            persistence: None,
        }
    }

    /// Returns the current table snapshot.
    pub fn snapshot(&self) -> Arc<UserTable> {
        self.table.load_full()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    /// Returns `true` if no users are stored.
    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    /// Lists all users in insertion order.
    pub fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.table.load().list())
    }

    /// Fetches a user by id.
    pub fn get_by_id(&self, id: u64) -> Result<User, StoreError> {
        self.table
            .load()
            .get(id)
            .cloned()
            .ok_or(StoreError::UserNotFound { id })
    }

    /// Inserts a user and returns it with its assigned id.
    ///
    /// # Errors
    /// `DuplicateEmail` if another user already has the email.
    pub fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = self.mutate(|table| table.insert(new_user))?;
        tracing::debug!("Inserted user {}", user.id);
        Ok(user)
    }

    /// Inserts several users as one write. Either all are stored or none.
    pub fn insert_batch(&self, new_users: Vec<NewUser>) -> Result<Vec<User>, StoreError> {
        let users = self.mutate(|table| {
            new_users
                .into_iter()
                .map(|new_user| table.insert(new_user))
                .collect::<Result<Vec<_>, _>>()
        })?;
        tracing::debug!("Inserted batch of {} users", users.len());
        Ok(users)
    }

    /// Overwrites the fields present in `patch`.
    ///
    /// # Errors
    /// `UserNotFound` if `id` is absent, `DuplicateEmail` if the new email
    /// belongs to a different user.
    pub fn update(&self, id: u64, patch: UserPatch) -> Result<User, StoreError> {
        let user = self.mutate(|table| table.update(id, patch))?;
        tracing::debug!("Updated user {}", id);
        Ok(user)
    }

    /// Deletes a user and returns the removed record.
    pub fn delete(&self, id: u64) -> Result<User, StoreError> {
        let user = self.mutate(|table| table.delete(id))?;
        tracing::debug!("Deleted user {}", id);
        Ok(user)
    }

    /// Applies `op` to a copy of the table, persists it, then publishes it.
    fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut UserTable) -> Result<T, StoreError>,
    {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;

        let mut next = UserTable::clone(&self.table.load());
        let result = op(&mut next)?;

        if let Some(persistence) = &self.persistence {
            persistence.flush_table(&next)?;
        }
        self.table.store(Arc::new(next));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_get_round_trip() {
        let store = UserStore::in_memory();
        let created = store
            .insert(NewUser::new("Zara Khan", "zara.khan@example.com"))
            .unwrap();
        assert!(created.id > 0);

        let fetched = store.get_by_id(created.id).unwrap();
        assert_eq!(fetched.name, "Zara Khan");
        assert_eq!(fetched.email, "zara.khan@example.com");
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let store = UserStore::in_memory();
        store
            .insert(NewUser::new("Meera Iyer", "meera.iyer@example.com"))
            .unwrap();

        let err = store
            .insert_batch(vec![
                NewUser::new("Vikram Singh", "vikram.singh@example.com"),
                NewUser::new("Meera Again", "meera.iyer@example.com"),
            ])
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateEmail { .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().next_id(), 2);
    }

    #[test]
    fn test_exhausted_id_sequence_keeps_store_writable() {
        let store = UserStore::in_memory();
        store.table.store(Arc::new(
            UserTable::from_parts(u64::MAX, Vec::new()).unwrap(),
        ));

        let err = store
            .insert(NewUser::new("Aarav Kumar", "aarav.kumar@example.com"))
            .unwrap_err();
        assert_eq!(err, StoreError::IdSequenceExhausted);
        assert!(store.is_empty());

        // The failed insert did not poison the writer lock
        let err = store
            .insert(NewUser::new("Priya Sharma", "priya.sharma@example.com"))
            .unwrap_err();
        assert_eq!(err, StoreError::IdSequenceExhausted);
        assert_eq!(store.delete(1).unwrap_err(), StoreError::UserNotFound { id: 1 });
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let store = UserStore::in_memory();
        store
            .insert(NewUser::new("Aarav Kumar", "aarav.kumar@example.com"))
            .unwrap();
        let snapshot = store.snapshot();

        store.delete(1).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(store.is_empty());
    }
}
