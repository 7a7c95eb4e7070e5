//! Pure domain logic for the academy back office.
//!
//! Shared types, the error taxonomy, the data-driven validation engine and the
//! pagination query builder. Nothing in this crate touches the database.

pub mod error;
pub mod password;
pub mod query;
pub mod roles;
pub mod types;
pub mod validation;
