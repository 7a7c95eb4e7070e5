//! Contact-form submission model.

use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// Allowed values for `contacts.subject`.
pub const CONTACT_SUBJECTS: &[&str] = &["information", "registration", "partnership", "other"];

/// A row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("first_name", FieldKind::Text).with(&[Constraint::MaxLength(100)]),
    FieldSpec::required("last_name", FieldKind::Text).with(&[Constraint::MaxLength(100)]),
    FieldSpec::required("email", FieldKind::Text)
        .with(&[Constraint::Email, Constraint::MaxLength(255)]),
    FieldSpec::optional("phone", FieldKind::Text).with(&[Constraint::MaxLength(30)]),
    FieldSpec::optional("company", FieldKind::Text).with(&[Constraint::MaxLength(150)]),
    FieldSpec::required("subject", FieldKind::Text).with(&[Constraint::OneOf(CONTACT_SUBJECTS)]),
    FieldSpec::required("message", FieldKind::Text).with(&[Constraint::MaxLength(5000)]),
];

pub static CONTACT_SCHEMA: EntitySchema = EntitySchema {
    entity: "Contact",
    table: "contacts",
    fields: FIELDS,
    searchable: &["first_name", "last_name", "email", "company", "message"],
    internal_columns: &[],
    relations: &[],
};

impl Entity for Contact {
    fn schema() -> &'static EntitySchema {
        &CONTACT_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
