//! Store configuration.

use std::path::PathBuf;

/// Name of the user data file inside the data directory.
pub const DATA_FILE_NAME: &str = "users.json";

/// User store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Data directory for persistence
    pub data_dir: PathBuf,
    /// Maximum retry attempts for transient I/O errors
    pub persistence_max_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub persistence_retry_delay_ms: u64,
}

impl StoreConfig {
    /// Full path of the user data file.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            persistence_max_retries: 3,
            persistence_retry_delay_ms: 100,
        }
    }
}
