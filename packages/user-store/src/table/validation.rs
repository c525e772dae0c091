//! Validation of persisted table contents.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::user::User;

/// Validates records loaded from disk before they back a table.
///
/// # Arguments
/// * `next_id` - Persisted id sequence value
/// * `users` - Persisted records
///
/// # Returns
/// `Result<(), StoreError>`; every failure is `DataCorruption`.
pub(crate) fn validate_records(next_id: u64, users: &[User]) -> Result<(), StoreError> {
    if next_id == 0 {
        return Err(StoreError::DataCorruption(
            "next_id 0 is reserved".to_string(),
        ));
    }

    let mut ids = HashSet::with_capacity(users.len());
    let mut emails = HashSet::with_capacity(users.len());

    for user in users {
        if user.id == 0 {
            return Err(StoreError::DataCorruption(
                "user id 0 is reserved".to_string(),
            ));
        }
        if !ids.insert(user.id) {
            return Err(StoreError::DataCorruption(format!(
                "duplicate user id {}",
                user.id
            )));
        }
        if !emails.insert(user.email.as_str()) {
            return Err(StoreError::DataCorruption(format!(
                "duplicate email '{}'",
                user.email
            )));
        }
        if user.id >= next_id {
            return Err(StoreError::DataCorruption(format!(
                "user id {} is not below next_id {}",
                user.id, next_id
            )));
        }
    }

    Ok(())
}
