//! Persistence manager for the user data file.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::table::UserTable;

use super::data_file::DataFile;
use super::io_utils::{classify_io_error, retry_io_operation};

/// Persistence manager for the user data file.
#[derive(Debug)]
pub struct PersistenceManager {
    /// Data directory path
    data_dir: PathBuf,
    /// Final data file path
    data_path: PathBuf,
    /// Temporary file written before the atomic rename
    temp_path: PathBuf,
    /// Maximum retry attempts for transient I/O errors
    max_retries: u32,
    /// Delay between retry attempts in milliseconds
    retry_delay_ms: u64,
}

impl PersistenceManager {
    /// Creates a new persistence manager with the given configuration.
    pub fn new(config: &StoreConfig) -> Self {
        let data_path = config.data_file();
        let mut temp_name = data_path.as_os_str().to_owned();
        temp_name.push(".tmp");

        Self {
            data_dir: config.data_dir.clone(),
            data_path,
            temp_path: PathBuf::from(temp_name),
            max_retries: config.persistence_max_retries,
            retry_delay_ms: config.persistence_retry_delay_ms,
        }
    }

    /// Path of the data file this manager reads and writes.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Loads the user table from disk.
    ///
    /// Creates the data directory if it does not exist. A missing data file
    /// yields an empty table.
    ///
    /// # Returns
    /// `Result<UserTable, StoreError>`; `DataCorruption` if the file cannot
    /// be trusted.
    pub fn load_table(&self) -> Result<UserTable, StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;

        if self.temp_path.exists() {
            // Leftover from an interrupted flush; the renamed file is authoritative
            tracing::warn!(
                "Removing stale temp file {}",
                self.temp_path.display()
            );
            fs::remove_file(&self.temp_path)
                .map_err(|e| classify_io_error(e, "Failed to remove stale temp file"))?;
        }

        if !self.data_path.exists() {
            tracing::debug!("No data file at {}, starting empty", self.data_path.display());
            return Ok(UserTable::new());
        }

        let contents = retry_io_operation(
            || self.read_data_file(),
            self.max_retries,
            self.retry_delay_ms,
            "load_table",
        )?;

        let data_file: DataFile = serde_json::from_slice(&contents).map_err(|e| {
            StoreError::DataCorruption(format!("Failed to parse data file: {}", e))
        })?;

        let table = data_file.into_table()?;
        tracing::debug!(
            "Loaded {} users from {}",
            table.len(),
            self.data_path.display()
        );
        Ok(table)
    }

    /// Flushes the user table to disk.
    ///
    /// # Arguments
    /// * `table` - Table to flush
    ///
    /// # Returns
    /// `Result<(), StoreError>` indicating success or failure.
    pub fn flush_table(&self, table: &UserTable) -> Result<(), StoreError> {
        let data_file = DataFile::from_table(table)?;
        let json = serde_json::to_vec_pretty(&data_file)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        retry_io_operation(
            || self.flush_table_internal(&json),
            self.max_retries,
            self.retry_delay_ms,
            "flush_table",
        )
    }

    /// Internal implementation of flush_table with retry logic.
    fn flush_table_internal(&self, json: &[u8]) -> Result<(), StoreError> {
        // Ensure data directory exists
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;

        // Write to temporary file
        let mut file = File::create(&self.temp_path)
            .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
        file.write_all(json)
            .map_err(|e| classify_io_error(e, "Failed to write data file"))?;
        file.sync_all()
            .map_err(|e| classify_io_error(e, "Failed to sync data file"))?;

        // Atomic rename
        fs::rename(&self.temp_path, &self.data_path)
            .map_err(|e| classify_io_error(e, "Failed to rename data file"))?;

        Ok(())
    }

    fn read_data_file(&self) -> Result<Vec<u8>, StoreError> {
        let mut file = File::open(&self.data_path)
            .map_err(|e| classify_io_error(e, "Failed to open data file"))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| classify_io_error(e, "Failed to read data file"))?;
        Ok(contents)
    }
}
