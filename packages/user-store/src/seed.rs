//! Sample data inserted into an empty store.

use crate::error::StoreError;
use crate::store::UserStore;
use crate::user::NewUser;

/// Sample users as `(name, email)` pairs, in insertion order.
pub const SAMPLE_USERS: [(&str, &str); 6] = [
    ("Aarav Kumar", "aarav.kumar@example.com"),
    ("Priya Sharma", "priya.sharma@example.com"),
    ("Rohan Patel", "rohan.patel@example.com"),
    ("Sneha Reddy", "sneha.reddy@example.com"),
    ("Vikram Singh", "vikram.singh@example.com"),
    ("Meera Iyer", "meera.iyer@example.com"),
];

/// Inserts the sample users if the store is empty.
///
/// # Returns
/// Number of users inserted: `SAMPLE_USERS.len()` on an empty store, `0`
/// otherwise.
pub fn seed_if_empty(store: &UserStore) -> Result<usize, StoreError> {
    if !store.list_all()?.is_empty() {
        tracing::debug!("Store already has data, skipping seed");
        return Ok(0);
    }

    let samples = SAMPLE_USERS
        .iter()
        .map(|(name, email)| NewUser::new(*name, *email))
        .collect();
    let inserted = store.insert_batch(samples)?;

    tracing::info!("Seeded {} sample users", inserted.len());
    Ok(inserted.len())
}
