//! Validated DTO values.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::rules::{Constraint, FieldKind, FieldSpec};
use crate::types::{DbId, Timestamp};

/// Which DTO shape an input is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtoMode {
    /// Required fields enforced; `id` / `created_at` may be supplied.
    Create,
    /// Partial update; `updated_at` / `deleted_at` may be supplied.
    Update,
}

const PAST: &[Constraint] = &[Constraint::NotInFuture];

const CREATE_OVERRIDES: &[FieldSpec] = &[
    FieldSpec::optional("id", FieldKind::Uuid),
    FieldSpec::optional("created_at", FieldKind::Timestamp).with(PAST),
];

const UPDATE_OVERRIDES: &[FieldSpec] = &[
    FieldSpec::optional("updated_at", FieldKind::Timestamp).with(PAST),
    FieldSpec::optional("deleted_at", FieldKind::Timestamp).with(PAST),
];

impl DtoMode {
    /// Audit columns a client may set explicitly in this mode.
    pub fn audit_overrides(self) -> &'static [FieldSpec] {
        match self {
            DtoMode::Create => CREATE_OVERRIDES,
            DtoMode::Update => UPDATE_OVERRIDES,
        }
    }
}

/// A typed, validated field value ready to be bound to a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Only produced for an explicit `deleted_at: null` (restore) on update.
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Timestamp(Timestamp),
    Uuid(DbId),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<DbId> {
        match self {
            FieldValue::Uuid(id) => Some(*id),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(n) => serializer.serialize_i64(*n),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Timestamp(t) => t.serialize(serializer),
            FieldValue::Uuid(id) => id.serialize(serializer),
        }
    }
}

/// A validated DTO: declared fields only, each with a typed value.
///
/// Ordered by field name so generated statements are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dto {
    values: BTreeMap<String, FieldValue>,
}

impl Dto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.values.remove(field)
    }

    /// Builder-style insert, handy for tests and hooks.
    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a Dto {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Serialize for Dto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
