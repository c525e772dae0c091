//! Integration test suite for the user store.
//!
//! Tests are organized by area:
//! 1. Full CRUD lifecycle and uniqueness under concurrent writers
//! 2. Persistence across reopen and failed flushes
//! 3. Seed data

pub mod end_to_end_tests;
pub mod persistence_tests;
pub mod seed_tests;
