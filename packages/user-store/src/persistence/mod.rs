//! User data file flush/load and recovery.

mod data_file;
mod io_utils;
mod persistence_manager;


pub use data_file::{DataFile, DATA_FILE_VERSION};
pub use io_utils::{classify_io_error, retry_io_operation};
pub use persistence_manager::PersistenceManager;
