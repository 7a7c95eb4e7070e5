//! Job offer model.

use academy_core::types::{DbId, Timestamp};
use academy_core::validation::{Constraint, EntitySchema, FieldKind, FieldSpec};
use serde::Serialize;
use sqlx::FromRow;

use super::entity::Entity;

/// Allowed values for `job_offers.contract_type`.
pub const CONTRACT_TYPES: &[&str] = &[
    "permanent",
    "fixed_term",
    "internship",
    "apprenticeship",
    "freelance",
];

/// A row from the `job_offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobOffer {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub contract_type: String,
    pub salary_range: Option<String>,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text).with(&[Constraint::MaxLength(200)]),
    FieldSpec::required("description", FieldKind::Text),
    FieldSpec::required("location", FieldKind::Text).with(&[Constraint::MaxLength(150)]),
    FieldSpec::required("contract_type", FieldKind::Text)
        .with(&[Constraint::OneOf(CONTRACT_TYPES)]),
    FieldSpec::optional("salary_range", FieldKind::Text).with(&[Constraint::MaxLength(100)]),
    FieldSpec::optional("is_published", FieldKind::Boolean),
    FieldSpec::optional("published_at", FieldKind::Timestamp),
];

pub static JOB_OFFER_SCHEMA: EntitySchema = EntitySchema {
    entity: "JobOffer",
    table: "job_offers",
    fields: FIELDS,
    searchable: &["title", "description", "location"],
    internal_columns: &[],
    relations: &[],
};

impl Entity for JobOffer {
    fn schema() -> &'static EntitySchema {
        &JOB_OFFER_SCHEMA
    }

    fn id(&self) -> DbId {
        self.id
    }
}
