//! REST API server for the user profile store.
//!
//! Provides HTTP endpoints for user CRUD operations, the JSON response
//! envelope, and request routing.

pub mod config;
pub mod handlers;
pub mod router;
pub mod server;
