//! Generic repository over any [`Entity`] table.
//!
//! Statements are assembled with [`QueryBuilder`]. Only column names taken
//! from the entity's static schema are ever interpolated into SQL; every
//! value is bound.

use std::collections::HashMap;
use std::marker::PhantomData;

use academy_core::query::{PaginationQuery, Visibility};
use academy_core::types::{new_id, DbId, Timestamp};
use academy_core::validation::{parse_filter_value, Dto, EntitySchema, FieldKind, FieldValue};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Entity, Page, Record};

/// Columns a create statement always sets itself.
const CREATE_RESERVED: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Columns an update statement never takes verbatim from the DTO.
const UPDATE_RESERVED: &[&str] = &["id", "created_at", "updated_at"];

/// Assignment prefix that moves `updated_at` strictly forward on every
/// mutation, even when the clock or a stored timestamp is ahead. The caller
/// binds the current time and closes the parenthesis.
const REFRESH_UPDATED_AT: &str =
    "updated_at = GREATEST(created_at, updated_at + interval '1 microsecond', ";

/// CRUD persistence for exactly one entity table.
///
/// Not-found is never an error here: `update` returns `None` and
/// `soft_delete` / `restore` return `false` when no row matches.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Insert a row, generating `id` and audit timestamps unless supplied.
    async fn create(&self, dto: &Dto) -> Result<E, sqlx::Error>;

    /// Merge `dto` into the live row with `id` and refresh `updated_at`.
    ///
    /// Soft-deleted rows only match when the DTO itself sets `deleted_at`.
    async fn update(&self, id: DbId, dto: &Dto) -> Result<Option<E>, sqlx::Error>;

    async fn find_by_id(
        &self,
        id: DbId,
        visibility: Visibility,
        populate_children: bool,
    ) -> Result<Option<Record<E>>, sqlx::Error>;

    /// Filter, search, sort and paginate.
    ///
    /// Expects a query that passed `PaginationQuery::validate`.
    async fn list(&self, query: &PaginationQuery) -> Result<Page<Record<E>>, sqlx::Error>;

    /// Mark a live row deleted. Returns `true` if a row was affected.
    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// Clear `deleted_at` on a soft-deleted row. Returns `true` if a row was affected.
    async fn restore(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

/// Postgres-backed [`Repository`] for the table described by `E::schema()`.
pub struct EntityRepo<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepo<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityRepo<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Attach every declared relation's live children to `records`.
    ///
    /// One statement per relation, covering all records at once.
    async fn load_children(&self, records: &mut [Record<E>]) -> Result<(), sqlx::Error> {
        let schema = E::schema();
        if records.is_empty() || schema.relations.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = records.iter().map(|r| r.row.id()).collect();
        let index: HashMap<DbId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        for relation in schema.relations {
            let order = relation.order_by.unwrap_or("created_at");
            let query = format!(
                "SELECT j.{local} AS owner_id, to_jsonb(t) AS child \
                 FROM {join} j \
                 JOIN {target} t ON t.id = j.{foreign} \
                 WHERE j.{local} = ANY($1) \
                   AND j.deleted_at IS NULL AND t.deleted_at IS NULL \
                 ORDER BY j.{order}, t.created_at",
                local = relation.local_key,
                join = relation.join_table,
                target = relation.target_table,
                foreign = relation.foreign_key,
            );
            let rows = sqlx::query_as::<_, (DbId, serde_json::Value)>(&query)
                .bind(ids.as_slice())
                .fetch_all(&self.pool)
                .await?;

            for record in records.iter_mut() {
                record.children.insert(relation.name, Vec::new());
            }
            for (owner_id, child) in rows {
                if let Some(&i) = index.get(&owner_id) {
                    records[i]
                        .children
                        .entry(relation.name)
                        .or_default()
                        .push(child);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for EntityRepo<E> {
    async fn create(&self, dto: &Dto) -> Result<E, sqlx::Error> {
        let schema = E::schema();
        let id = dto
            .get("id")
            .and_then(FieldValue::as_uuid)
            .unwrap_or_else(new_id);
        let created_at = dto
            .get("created_at")
            .and_then(FieldValue::as_timestamp)
            .unwrap_or_else(Utc::now);
        let columns = writable_columns(schema, dto, CREATE_RESERVED)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} (id, created_at, updated_at",
            schema.table
        ));
        for (column, _, _) in &columns {
            qb.push(", ").push(column);
        }
        qb.push(") VALUES (")
            .push_bind(id)
            .push(", ")
            .push_bind(created_at)
            .push(", ")
            .push_bind(created_at);
        for (_, kind, value) in &columns {
            qb.push(", ");
            push_value(&mut qb, *kind, value);
        }
        qb.push(") RETURNING *");

        qb.build_query_as::<E>().fetch_one(&self.pool).await
    }

    async fn update(&self, id: DbId, dto: &Dto) -> Result<Option<E>, sqlx::Error> {
        let schema = E::schema();
        let columns = writable_columns(schema, dto, UPDATE_RESERVED)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", schema.table));
        for (column, kind, value) in &columns {
            qb.push(column).push(" = ");
            push_value(&mut qb, *kind, value);
            qb.push(", ");
        }
        match dto.get("updated_at").and_then(FieldValue::as_timestamp) {
            // An override is honoured as given, but never before created_at.
            Some(at) => qb.push("updated_at = GREATEST(created_at, ").push_bind(at).push(")"),
            None => qb.push(REFRESH_UPDATED_AT).push_bind(Utc::now()).push(")"),
        };
        qb.push(" WHERE id = ").push_bind(id);
        if !dto.contains("deleted_at") {
            qb.push(" AND deleted_at IS NULL");
        }
        qb.push(" RETURNING *");

        qb.build_query_as::<E>().fetch_optional(&self.pool).await
    }

    async fn find_by_id(
        &self,
        id: DbId,
        visibility: Visibility,
        populate_children: bool,
    ) -> Result<Option<Record<E>>, sqlx::Error> {
        let schema = E::schema();
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT * FROM {} WHERE id = ", schema.table));
        qb.push_bind(id);
        if visibility == Visibility::Active {
            qb.push(" AND deleted_at IS NULL");
        }

        let Some(row) = qb.build_query_as::<E>().fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        let mut records = [Record::new(row)];
        if populate_children {
            self.load_children(&mut records).await?;
        }
        let [record] = records;
        Ok(Some(record))
    }

    async fn list(&self, query: &PaginationQuery) -> Result<Page<Record<E>>, sqlx::Error> {
        let schema = E::schema();

        let mut count_qb =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", schema.table));
        push_predicates(&mut count_qb, schema, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let (sort_column, order) = schema.resolve_sort(query);
        let direction = order.as_sql();

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", schema.table));
        push_predicates(&mut qb, schema, query);
        qb.push(format!(
            " ORDER BY {sort_column} {direction}, id {direction}"
        ));
        qb.push(" LIMIT ")
            .push_bind(query.page_size.max(1))
            .push(" OFFSET ")
            .push_bind(query.offset().max(0));

        let rows = qb.build_query_as::<E>().fetch_all(&self.pool).await?;
        let mut records: Vec<Record<E>> = rows.into_iter().map(Record::new).collect();
        if query.populate_children {
            self.load_children(&mut records).await?;
        }

        Ok(Page {
            rows: records,
            total,
        })
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted_at = $1, {REFRESH_UPDATED_AT}$1) \
             WHERE id = $2 AND deleted_at IS NULL",
            E::schema().table
        );
        let result = sqlx::query(&query)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted_at = NULL, {REFRESH_UPDATED_AT}$1) \
             WHERE id = $2 AND deleted_at IS NOT NULL",
            E::schema().table
        );
        let result = sqlx::query(&query)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// DTO entries that map onto writable columns, minus `reserved` ones.
///
/// A DTO key that is not a column of the table is a programming error
/// (a hook forgot to translate it) and is reported as `ColumnNotFound`.
fn writable_columns<'a>(
    schema: &EntitySchema,
    dto: &'a Dto,
    reserved: &[&str],
) -> Result<Vec<(&'a str, FieldKind, &'a FieldValue)>, sqlx::Error> {
    let mut columns = Vec::with_capacity(dto.len());
    for (name, value) in dto {
        if reserved.contains(&name.as_str()) {
            continue;
        }
        let kind = schema
            .column_kind(name)
            .ok_or_else(|| sqlx::Error::ColumnNotFound(format!("{}.{name}", schema.table)))?;
        columns.push((name.as_str(), kind, value));
    }
    Ok(columns)
}

/// Bind one DTO value, typing `NULL` after the column kind.
fn push_value(qb: &mut QueryBuilder<'_, Postgres>, kind: FieldKind, value: &FieldValue) {
    match value {
        FieldValue::Null => match kind {
            FieldKind::Text | FieldKind::Secret => qb.push_bind(None::<String>),
            FieldKind::Integer => qb.push_bind(None::<i64>),
            FieldKind::Number => qb.push_bind(None::<f64>),
            FieldKind::Boolean => qb.push_bind(None::<bool>),
            FieldKind::Timestamp => qb.push_bind(None::<Timestamp>),
            FieldKind::Uuid => qb.push_bind(None::<DbId>),
        },
        FieldValue::Text(s) => qb.push_bind(s.clone()),
        FieldValue::Integer(n) => qb.push_bind(*n),
        FieldValue::Number(n) => qb.push_bind(*n),
        FieldValue::Boolean(b) => qb.push_bind(*b),
        FieldValue::Timestamp(t) => qb.push_bind(*t),
        FieldValue::Uuid(id) => qb.push_bind(*id),
    };
}

/// Append the `WHERE` clause shared by the count and page statements.
fn push_predicates(qb: &mut QueryBuilder<'_, Postgres>, schema: &EntitySchema, query: &PaginationQuery) {
    qb.push(" WHERE TRUE");

    if !query.include_deleted {
        qb.push(" AND deleted_at IS NULL");
    }

    for (key, value) in &query.filters {
        match schema.queryable_column(key) {
            Some((column, kind)) if kind.is_textual() => {
                qb.push(format!(" AND {column} ILIKE "))
                    .push_bind(contains_pattern(value));
            }
            Some((column, kind)) => match parse_filter_value(kind, value) {
                Some(typed) => {
                    qb.push(format!(" AND {column} = "));
                    push_value(qb, kind, &typed);
                }
                None => {
                    tracing::debug!(entity = schema.entity, filter = %key, "Filter value does not parse, matching nothing");
                    qb.push(" AND FALSE");
                }
            },
            None => {
                tracing::debug!(entity = schema.entity, filter = %key, "Ignoring filter on unknown column");
            }
        }
    }

    if let Some(search) = query.search.as_deref() {
        if !schema.searchable.is_empty() {
            let pattern = contains_pattern(search);
            qb.push(" AND (");
            for (i, column) in schema.searchable.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(format!("{column} ILIKE ")).push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }
}

/// `%value%` with LIKE metacharacters escaped.
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::CONTACT_SCHEMA;
    use crate::models::training::TRAINING_SCHEMA;
    use crate::models::user::USER_SCHEMA;

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("plain"), "%plain%");
    }

    #[test]
    fn writable_columns_skip_reserved_and_reject_unknown() {
        let dto = Dto::new()
            .with("email", FieldValue::Text("a@b.co".into()))
            .with("id", FieldValue::Uuid(new_id()));
        let columns = writable_columns(&CONTACT_SCHEMA, &dto, CREATE_RESERVED).unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].0, "email");

        let dto = Dto::new().with("password", FieldValue::Text("secret-pass".into()));
        let err = writable_columns(&USER_SCHEMA, &dto, CREATE_RESERVED).unwrap_err();
        assert!(matches!(err, sqlx::Error::ColumnNotFound(ref c) if c == "users.password"));
    }

    #[test]
    fn predicates_ignore_unknown_filters_and_bind_values() {
        let mut query = PaginationQuery::default();
        query.filters.insert("company".into(), "acme".into());
        query.filters.insert("1=1; --".into(), "boom".into());
        query.search = Some("ada".into());

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM contacts");
        push_predicates(&mut qb, &CONTACT_SCHEMA, &query);
        let sql = qb.sql();

        assert!(sql.contains("deleted_at IS NULL"));
        assert!(sql.contains("company ILIKE $1"));
        assert!(!sql.contains("1=1"));
        assert!(sql.contains("(first_name ILIKE $2 OR last_name ILIKE $3"));
    }

    #[test]
    fn typed_filters_bind_typed_values() {
        let mut query = PaginationQuery::default();
        query.filters.insert("created_at".into(), "2024-01-15T10:00:00Z".into());
        query.filters.insert("id".into(), "0190B8A4-7C1E-7000-8000-000000000001".into());
        query.filters.insert("is_published".into(), "true".into());
        query.filters.insert("price".into(), "cheap".into());

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM trainings");
        push_predicates(&mut qb, &TRAINING_SCHEMA, &query);
        let sql = qb.sql();

        assert!(!sql.contains("::text"));
        assert!(sql.contains("created_at = $1"));
        assert!(sql.contains("id = $2"));
        assert!(sql.contains("is_published = $3"));
        assert!(sql.ends_with("AND FALSE"));
    }

    #[test]
    fn include_deleted_drops_the_soft_delete_predicate() {
        let query = PaginationQuery {
            include_deleted: true,
            ..PaginationQuery::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        push_predicates(&mut qb, &CONTACT_SCHEMA, &query);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM contacts WHERE TRUE");
    }
}
