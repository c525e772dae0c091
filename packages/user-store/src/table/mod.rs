//! In-memory user table and its uniqueness index.

#[allow(clippy::module_inception)]
mod table;
pub(crate) mod validation;

pub use table::UserTable;
