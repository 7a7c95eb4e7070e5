//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeUser`] -- Same, but anonymous requests pass through.
//! - [`rbac::Access`] / [`rbac::AccessPolicy`] -- Per-resource role requirements.

pub mod auth;
pub mod rbac;
