//! User table with email index.
//!
//! Each table has:
//! - Records ordered by id (which is also insertion order)
//! - An email index enforcing one user per email
//! - A record id sequence that never goes backwards

use std::collections::{BTreeMap, HashMap};

use crate::error::StoreError;
use crate::user::{NewUser, User, UserPatch};

use super::validation;

/// In-memory user table.
///
/// Plain value type: the store clones it, mutates the clone and publishes
/// the clone once it is durable, so every method here either fully applies
/// or leaves `self` untouched.
#[derive(Debug, Clone)]
pub struct UserTable {
    /// Records keyed by id
    records: BTreeMap<u64, User>,
    /// Email to owning record id
    email_index: HashMap<String, u64>,
    /// Next record id to assign
    next_id: u64,
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UserTable {
    /// Creates an empty table whose first id will be 1.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            email_index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a table from persisted parts.
    ///
    /// # Arguments
    /// * `next_id` - Persisted id sequence value
    /// * `users` - Persisted records
    ///
    /// # Returns
    /// `Result<UserTable, StoreError>`; `DataCorruption` if the parts break
    /// id or email uniqueness or the sequence is behind the largest id.
    pub fn from_parts(next_id: u64, users: Vec<User>) -> Result<Self, StoreError> {
        validation::validate_records(next_id, &users)?;

        let mut table = Self {
            records: BTreeMap::new(),
            email_index: HashMap::with_capacity(users.len()),
            next_id,
        };
        for user in users {
            table.email_index.insert(user.email.clone(), user.id);
            table.records.insert(user.id, user);
        }
        Ok(table)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id that the next insert will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Iterates records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.records.values()
    }

    /// Clones all records in id order.
    pub fn list(&self) -> Vec<User> {
        self.records.values().cloned().collect()
    }

    /// Looks up a record by id.
    pub fn get(&self, id: u64) -> Option<&User> {
        self.records.get(&id)
    }

    /// Returns the id of the record owning `email`, if any.
    pub fn id_for_email(&self, email: &str) -> Option<u64> {
        self.email_index.get(email).copied()
    }

    /// Inserts a new record with a freshly assigned id.
    ///
    /// # Returns
    /// The stored user, `DuplicateEmail` if the email is taken, or
    /// `IdSequenceExhausted` once the last id has been issued.
    pub fn insert(&mut self, new_user: NewUser) -> Result<User, StoreError> {
        if self.email_index.contains_key(&new_user.email) {
            return Err(StoreError::DuplicateEmail {
                email: new_user.email,
            });
        }

        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(StoreError::IdSequenceExhausted)?;

        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
        };
        self.email_index.insert(user.email.clone(), id);
        self.records.insert(id, user.clone());
        Ok(user)
    }

    /// Applies a partial overwrite to an existing record.
    ///
    /// # Returns
    /// The updated user, `UserNotFound` if `id` is absent, or
    /// `DuplicateEmail` if the new email belongs to a different record.
    pub fn update(&mut self, id: u64, patch: UserPatch) -> Result<User, StoreError> {
        let current_email = match self.records.get(&id) {
            Some(user) => user.email.clone(),
            None => return Err(StoreError::UserNotFound { id }),
        };

        if let Some(email) = &patch.email {
            if let Some(owner) = self.id_for_email(email) {
                if owner != id {
                    return Err(StoreError::DuplicateEmail {
                        email: email.clone(),
                    });
                }
            }
        }

        let user = self
            .records
            .get_mut(&id)
            .ok_or(StoreError::UserNotFound { id })?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            if email != current_email {
                self.email_index.remove(&current_email);
                self.email_index.insert(email.clone(), id);
            }
            user.email = email;
        }

        Ok(user.clone())
    }

    /// Removes a record. Its id is not handed out again.
    pub fn delete(&mut self, id: u64) -> Result<User, StoreError> {
        let user = self
            .records
            .remove(&id)
            .ok_or(StoreError::UserNotFound { id })?;
        self.email_index.remove(&user.email);
        Ok(user)
    }
}
