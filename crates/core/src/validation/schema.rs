//! Static per-entity schemas: table layout, DTO fields, searchable columns and
//! eager-loadable relations.

use super::evaluator::{kind_label, parse_filter_value};
use super::rules::{FieldKind, FieldSpec, ValidationError, ViolationReason};
use crate::query::{PaginationQuery, SortOrder};

/// Audit columns carried by every entity table.
pub const AUDIT_COLUMNS: &[(&str, FieldKind)] = &[
    ("id", FieldKind::Uuid),
    ("created_at", FieldKind::Timestamp),
    ("updated_at", FieldKind::Timestamp),
    ("deleted_at", FieldKind::Timestamp),
];

/// Column used when no (valid) sort column is requested.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// A many-to-many relation loaded on `populate_children`.
///
/// The join table is itself a full entity (audit columns included), so
/// soft-deleted join rows are skipped along with soft-deleted targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Key under which the children appear in the serialized record.
    pub name: &'static str,
    pub join_table: &'static str,
    /// Join-table column referencing the owning entity.
    pub local_key: &'static str,
    /// Join-table column referencing the child entity.
    pub foreign_key: &'static str,
    pub target_table: &'static str,
    /// Optional join-table column the children are ordered by.
    pub order_by: Option<&'static str>,
}

/// Declarative description of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySchema {
    /// Human-readable entity name used in errors and logs.
    pub entity: &'static str,
    pub table: &'static str,
    /// DTO fields, in declaration order.
    pub fields: &'static [FieldSpec],
    /// Columns matched by the free-text `search` option.
    pub searchable: &'static [&'static str],
    /// Persisted columns that are not DTO fields (written by hooks only).
    pub internal_columns: &'static [&'static str],
    pub relations: &'static [Relation],
}

impl EntitySchema {
    /// Kind of a column that may appear in filters and sorting.
    ///
    /// Covers audit columns and every non-secret DTO field. Internal
    /// columns are never exposed.
    pub fn queryable_column(&self, name: &str) -> Option<(&'static str, FieldKind)> {
        if let Some((column, kind)) = AUDIT_COLUMNS.iter().find(|(c, _)| *c == name) {
            return Some((*column, *kind));
        }
        self.fields
            .iter()
            .find(|f| f.name == name && f.kind != FieldKind::Secret)
            .map(|f| (f.name, f.kind))
    }

    /// Kind of a column that may be written by an insert or update statement.
    ///
    /// Internal columns are text. Secret fields are never columns.
    pub fn column_kind(&self, name: &str) -> Option<FieldKind> {
        if let Some((_, kind)) = self.queryable_column(name) {
            return Some(kind);
        }
        self.internal_columns
            .contains(&name)
            .then_some(FieldKind::Text)
    }

    /// Reject filters on typed columns whose value does not parse as that type.
    ///
    /// Keys that are not queryable columns are left alone; listing ignores them.
    pub fn check_filters(&self, query: &PaginationQuery) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        for (key, value) in &query.filters {
            if let Some((column, kind)) = self.queryable_column(key) {
                if parse_filter_value(kind, value).is_none() {
                    errors.push(
                        column,
                        ViolationReason::InvalidType,
                        format!("must be {}", kind_label(kind)),
                    );
                }
            }
        }
        errors.into_result(())
    }

    /// Resolve the effective sort column and direction of a query.
    ///
    /// - No `sort_by`: `created_at`, requested direction or descending.
    /// - Unknown `sort_by`: the default sort, `created_at DESC`.
    /// - Known `sort_by`: that column, requested direction or ascending.
    pub fn resolve_sort(&self, query: &PaginationQuery) -> (&'static str, SortOrder) {
        match query.sort_by.as_deref() {
            None => (
                DEFAULT_SORT_COLUMN,
                query.sort_order.unwrap_or(SortOrder::Desc),
            ),
            Some(requested) => match self.queryable_column(requested) {
                Some((column, _)) => (column, query.sort_order.unwrap_or(SortOrder::Asc)),
                None => (DEFAULT_SORT_COLUMN, SortOrder::Desc),
            },
        }
    }
}
