//! Training model. A training aggregates modules and key competencies through
//! the `training_modules` and `training_key_competencies` relation entities.

use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec, Relation};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// Allowed values for `trainings.format`.
pub const TRAINING_FORMATS: &[&str] = &["onsite", "remote", "hybrid"];

/// URL slug: lowercase words separated by single hyphens.
pub const SLUG_PATTERN: &str = "^[a-z0-9]+(-[a-z0-9]+)*$";

/// Relation name under which modules are loaded.
pub const RELATION_MODULES: &str = "modules";

/// Relation name under which key competencies are loaded.
pub const RELATION_KEY_COMPETENCIES: &str = "key_competencies";

/// A row from the `trainings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Training {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration_days: Option<f64>,
    pub format: String,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text).with(&[Constraint::MaxLength(200)]),
    FieldSpec::required("slug", FieldKind::Text)
        .with(&[Constraint::Pattern(SLUG_PATTERN), Constraint::MaxLength(200)]),
    FieldSpec::optional("summary", FieldKind::Text).with(&[Constraint::MaxLength(500)]),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::optional("price", FieldKind::Number).with(&[Constraint::Min(0.0)]),
    FieldSpec::optional("duration_days", FieldKind::Number).with(&[Constraint::Min(0.0)]),
    FieldSpec::required("format", FieldKind::Text).with(&[Constraint::OneOf(TRAINING_FORMATS)]),
    FieldSpec::optional("is_published", FieldKind::Boolean),
];

const RELATIONS: &[Relation] = &[
    Relation {
        name: RELATION_MODULES,
        join_table: "training_modules",
        local_key: "training_id",
        foreign_key: "module_id",
        target_table: "modules",
        order_by: Some("position"),
    },
    Relation {
        name: RELATION_KEY_COMPETENCIES,
        join_table: "training_key_competencies",
        local_key: "training_id",
        foreign_key: "key_competency_id",
        target_table: "key_competencies",
        order_by: None,
    },
];

pub static TRAINING_SCHEMA: EntitySchema = EntitySchema {
    entity: "Training",
    table: "trainings",
    fields: FIELDS,
    searchable: &["title", "summary", "description"],
    internal_columns: &[],
    relations: RELATIONS,
};

impl Entity for Training {
    fn schema() -> &'static EntitySchema {
        &TRAINING_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
