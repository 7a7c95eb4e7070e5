//! Training-to-module relation entity.

use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// A row from the `training_modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingModule {
    pub id: DbId,
    pub training_id: DbId,
    pub module_id: DbId,
    /// Display order of the module within the training.
    pub position: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("training_id", FieldKind::Uuid),
    FieldSpec::required("module_id", FieldKind::Uuid),
    FieldSpec::optional("position", FieldKind::Integer).with(&[Constraint::Min(0.0)]),
];

pub static TRAINING_MODULE_SCHEMA: EntitySchema = EntitySchema {
    entity: "TrainingModule",
    table: "training_modules",
    fields: FIELDS,
    searchable: &[],
    internal_columns: &[],
    relations: &[],
};

impl Entity for TrainingModule {
    fn schema() -> &'static EntitySchema {
        &TRAINING_MODULE_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
