//! Back-office user model.

use academy_core::password::MIN_PASSWORD_LENGTH;
use academy_core::roles::ALL_ROLES;
use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// Full user row from the `users` table.
///
/// `password_hash` is skipped during serialization so rows can be returned
/// from the API as-is.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("email", FieldKind::Text)
        .with(&[Constraint::Email, Constraint::MaxLength(255)]),
    FieldSpec::required("first_name", FieldKind::Text).with(&[Constraint::MaxLength(100)]),
    FieldSpec::required("last_name", FieldKind::Text).with(&[Constraint::MaxLength(100)]),
    FieldSpec::required("role", FieldKind::Text).with(&[Constraint::OneOf(ALL_ROLES)]),
    FieldSpec::required("password", FieldKind::Secret)
        .with(&[Constraint::MinLength(MIN_PASSWORD_LENGTH), Constraint::MaxLength(128)]),
];

pub static USER_SCHEMA: EntitySchema = EntitySchema {
    entity: "User",
    table: "users",
    fields: FIELDS,
    searchable: &["email", "first_name", "last_name"],
    internal_columns: &["password_hash"],
    relations: &[],
};

impl Entity for User {
    fn schema() -> &'static EntitySchema {
        &USER_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
