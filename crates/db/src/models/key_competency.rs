use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// A row from the `key_competencies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct KeyCompetency {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text).with(&[Constraint::MaxLength(150)]),
    FieldSpec::optional("description", FieldKind::Text),
];

pub static KEY_COMPETENCY_SCHEMA: EntitySchema = EntitySchema {
    entity: "KeyCompetency",
    table: "key_competencies",
    fields: FIELDS,
    searchable: &["name", "description"],
    internal_columns: &[],
    relations: &[],
};

impl Entity for KeyCompetency {
    fn schema() -> &'static EntitySchema {
        &KEY_COMPETENCY_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
