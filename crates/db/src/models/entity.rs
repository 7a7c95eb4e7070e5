//! The [`Entity`] trait and the record/page envelopes returned by reads.

use std::collections::BTreeMap;

use academy_core::types::DbId;
use academy_core::validation::EntitySchema;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;

/// A row type persisted in exactly one table with the standard audit columns
/// (`id`, `created_at`, `updated_at`, `deleted_at`).
pub trait Entity:
    for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Sync + Unpin + 'static
{
    /// Static description of the table and its DTO fields.
    fn schema() -> &'static EntitySchema;

    fn id(&self) -> DbId;
}

/// A row plus any eagerly loaded children (`populate_children`).
///
/// Children serialize under their relation name next to the row's own fields.
#[derive(Debug, Clone, Serialize)]
pub struct Record<E> {
    #[serde(flatten)]
    pub row: E,
    #[serde(flatten)]
    pub children: BTreeMap<&'static str, Vec<serde_json::Value>>,
}

impl<E> Record<E> {
    pub fn new(row: E) -> Self {
        Self {
            row,
            children: BTreeMap::new(),
        }
    }

    pub fn children(&self, relation: &str) -> Option<&[serde_json::Value]> {
        self.children.get(relation).map(Vec::as_slice)
    }
}

/// One page of a listing plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: i64,
}
