//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Password hashing lives in `academy_core::password` so the user hooks can
//! hash before persistence.

pub mod jwt;
