//! Store error types.

use thiserror::Error;

/// User store operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No user with the given id
    #[error("User {id} not found")]
    UserNotFound { id: u64 },

    /// Email already belongs to another user
    #[error("Email '{email}' already exists")]
    DuplicateEmail { email: String },

    /// Record id sequence has no ids left to assign
    #[error("User id sequence exhausted")]
    IdSequenceExhausted,

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Lock poisoned (writer mutex poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// Data corruption detected
    #[error("Data corruption detected: {0}")]
    DataCorruption(String),

    /// Disk full error during persistence
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// I/O error during persistence
    #[error("I/O error: {0}")]
    IoError(String),

    /// Transient I/O error that may succeed on retry
    #[error("Transient I/O error: {0}")]
    TransientIoError(String),
}
