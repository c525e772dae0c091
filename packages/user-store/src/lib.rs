//! Storage layer for the user profile API.
//!
//! Provides the user table with its email uniqueness index, durable
//! persistence to a single data file, and the startup seed data.

pub mod config;
pub mod error;
pub mod persistence;
pub mod seed;
pub mod store;
pub mod table;
pub mod user;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::UserStore;
pub use user::{NewUser, User, UserPatch};
