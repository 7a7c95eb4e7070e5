//! Per-entity extension points run between validation and persistence.
//!
//! Hooks receive an already validated [`Dto`] and may rewrite it or reject
//! the operation. They never touch the database, so a rejected operation
//! leaves no trace.

use academy_core::error::CoreError;
use academy_core::password::hash_password;
use academy_core::types::DbId;
use academy_core::validation::{Dto, FieldValue};

use super::context::RequestContext;

/// Strategy object attached to an entity service. Both hooks default to no-ops.
pub trait EntityHooks: Send + Sync {
    fn before_create(&self, _ctx: &RequestContext, _dto: &mut Dto) -> Result<(), CoreError> {
        Ok(())
    }

    fn before_update(
        &self,
        _ctx: &RequestContext,
        _id: DbId,
        _dto: &mut Dto,
    ) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Hooks for entities without special behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl EntityHooks for NoHooks {}

/// Hooks for the `users` table.
///
/// - The write-only `password` field is replaced by an Argon2id `password_hash`.
/// - Emails are stored lowercase.
/// - Only admins may change a user's role.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserHooks;

impl UserHooks {
    fn hash_password_field(dto: &mut Dto) -> Result<(), CoreError> {
        if let Some(FieldValue::Text(password)) = dto.remove("password") {
            let hash = hash_password(&password)
                .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))?;
            dto.insert("password_hash", FieldValue::Text(hash));
        }
        Ok(())
    }

    fn lowercase_email(dto: &mut Dto) {
        if let Some(email) = dto.get("email").and_then(FieldValue::as_text) {
            let lowered = email.to_lowercase();
            dto.insert("email", FieldValue::Text(lowered));
        }
    }
}

impl EntityHooks for UserHooks {
    fn before_create(&self, _ctx: &RequestContext, dto: &mut Dto) -> Result<(), CoreError> {
        Self::lowercase_email(dto);
        Self::hash_password_field(dto)
    }

    fn before_update(
        &self,
        ctx: &RequestContext,
        _id: DbId,
        dto: &mut Dto,
    ) -> Result<(), CoreError> {
        if dto.contains("role") && !ctx.is_admin() {
            return Err(CoreError::Forbidden(
                "Only administrators can change a user's role".into(),
            ));
        }
        Self::lowercase_email(dto);
        Self::hash_password_field(dto)
    }
}
