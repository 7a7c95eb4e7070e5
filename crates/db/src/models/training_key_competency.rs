//! Training-to-key-competency relation entity.

use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// A row from the `training_key_competencies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingKeyCompetency {
    pub id: DbId,
    pub training_id: DbId,
    pub key_competency_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("training_id", FieldKind::Uuid),
    FieldSpec::required("key_competency_id", FieldKind::Uuid),
];

pub static TRAINING_KEY_COMPETENCY_SCHEMA: EntitySchema = EntitySchema {
    entity: "TrainingKeyCompetency",
    table: "training_key_competencies",
    fields: FIELDS,
    searchable: &[],
    internal_columns: &[],
    relations: &[],
};

impl Entity for TrainingKeyCompetency {
    fn schema() -> &'static EntitySchema {
        &TRAINING_KEY_COMPETENCY_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
