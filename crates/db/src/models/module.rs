//! Training module model. Modules are shared building blocks attached to
//! trainings through `training_modules`.

use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// Allowed values for `modules.level`.
pub const MODULE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

/// A row from the `modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Module {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: f64,
    pub level: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text).with(&[Constraint::MaxLength(200)]),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::required("duration_hours", FieldKind::Number).with(&[Constraint::Min(0.0)]),
    FieldSpec::required("level", FieldKind::Text).with(&[Constraint::OneOf(MODULE_LEVELS)]),
];

pub static MODULE_SCHEMA: EntitySchema = EntitySchema {
    entity: "Module",
    table: "modules",
    fields: FIELDS,
    searchable: &["title", "description"],
    internal_columns: &[],
    relations: &[],
};

impl Entity for Module {
    fn schema() -> &'static EntitySchema {
        &MODULE_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
