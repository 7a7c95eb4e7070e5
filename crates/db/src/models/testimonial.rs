use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// A row from the `testimonials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub author_name: String,
    pub author_role: Option<String>,
    pub content: String,
    /// 1 to 5 stars.
    pub rating: i64,
    pub training_id: Option<DbId>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("author_name", FieldKind::Text).with(&[Constraint::MaxLength(150)]),
    FieldSpec::optional("author_role", FieldKind::Text).with(&[Constraint::MaxLength(150)]),
    FieldSpec::required("content", FieldKind::Text).with(&[Constraint::MaxLength(2000)]),
    FieldSpec::required("rating", FieldKind::Integer)
        .with(&[Constraint::Min(1.0), Constraint::Max(5.0)]),
    FieldSpec::optional("training_id", FieldKind::Uuid),
    FieldSpec::optional("is_published", FieldKind::Boolean),
];

pub static TESTIMONIAL_SCHEMA: EntitySchema = EntitySchema {
    entity: "Testimonial",
    table: "testimonials",
    fields: FIELDS,
    searchable: &["author_name", "content"],
    internal_columns: &[],
    relations: &[],
};

impl Entity for Testimonial {
    fn schema() -> &'static EntitySchema {
        &TESTIMONIAL_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
