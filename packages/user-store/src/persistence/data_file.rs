//! On-disk format of the user data file.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::table::UserTable;
use crate::user::User;

/// Current data file format version.
pub const DATA_FILE_VERSION: u32 = 1;

/// User data file contents.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataFile {
    /// Format version
    pub version: u32,
    /// Id sequence value at flush time
    pub next_id: u64,
    /// CRC32 over `version`, `next_id` and `users`
    pub checksum: u32,
    /// Records in id order
    pub users: Vec<User>,
}

impl DataFile {
    /// Snapshots a table into a data file with a fresh checksum.
    pub fn from_table(table: &UserTable) -> Result<Self, StoreError> {
        let users = table.list();
        let next_id = table.next_id();
        let checksum = checksum_contents(DATA_FILE_VERSION, next_id, &users)?;
        Ok(Self {
            version: DATA_FILE_VERSION,
            next_id,
            checksum,
            users,
        })
    }

    /// Verifies version and checksum and rebuilds the table.
    pub fn into_table(self) -> Result<UserTable, StoreError> {
        if self.version != DATA_FILE_VERSION {
            return Err(StoreError::DataCorruption(format!(
                "Unsupported data file version: {}",
                self.version
            )));
        }

        let actual = checksum_contents(self.version, self.next_id, &self.users)?;
        if actual != self.checksum {
            return Err(StoreError::DataCorruption(format!(
                "Checksum mismatch: expected {:08x}, got {:08x}",
                self.checksum, actual
            )));
        }

        UserTable::from_parts(self.next_id, self.users)
    }
}

/// Calculates CRC32 checksum over the compact JSON encoding of
/// `[version, next_id, users]`.
fn checksum_contents(version: u32, next_id: u64, users: &[User]) -> Result<u32, StoreError> {
    let bytes = serde_json::to_vec(&(version, next_id, users))
        .map_err(|e| StoreError::SerializationError(e.to_string()))?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}
