//! Repository layer.
//!
//! [`EntityRepo`] serves every entity table through the [`Repository`]
//! trait. [`UserRepo`] adds the zero-sized lookups authentication needs.

pub mod entity_repo;
pub mod user_repo;

pub use entity_repo::{EntityRepo, Repository};
pub use user_repo::UserRepo;
