//! Generic handlers shared by every entity resource.
//!
//! Each resource router instantiates these for its entity type and attaches
//! an [`AccessPolicy`] extension (see `routes::entity`).

use std::collections::HashMap;
use std::sync::Arc;

use academy_core::error::CoreError;
use academy_core::query::{build_pagination_query, Visibility};
use academy_core::types::DbId;
use academy_db::models::{Entity, Page, Record};
use academy_db::services::EntityService;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeUser;
use crate::middleware::rbac::AccessPolicy;
use crate::state::AppState;

type RawQuery = Query<HashMap<String, String>>;

/// GET /{resource}
///
/// Query keys: `page`, `pageSize`, `search`, `sortBy`, `sortOrder`,
/// `includeDeleted`, `populateChildren`; any other key filters on a column.
pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Extension(policy): Extension<AccessPolicy>,
    user: MaybeUser,
    Query(raw): RawQuery,
) -> AppResult<Json<Page<Record<E>>>> {
    let query = build_pagination_query(&raw).map_err(CoreError::from)?;
    policy
        .read_access(query.include_deleted)
        .check(user.0.as_ref())?;

    let page = service::<E>(&state)?.list(&query).await?;
    Ok(Json(page))
}

/// GET /{resource}/{id}
///
/// Honours `includeDeleted` and `populateChildren`.
pub async fn get_by_id<E: Entity>(
    State(state): State<AppState>,
    Extension(policy): Extension<AccessPolicy>,
    user: MaybeUser,
    Path(id): Path<DbId>,
    Query(raw): RawQuery,
) -> AppResult<Json<Record<E>>> {
    let query = build_pagination_query(&raw).map_err(CoreError::from)?;
    policy
        .read_access(query.include_deleted)
        .check(user.0.as_ref())?;

    let visibility = Visibility::from_include_deleted(query.include_deleted);
    service::<E>(&state)?
        .find_by_id(id, visibility, query.populate_children)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<E>(id))
}

/// POST /{resource}
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Extension(policy): Extension<AccessPolicy>,
    user: MaybeUser,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<E>)> {
    policy.create.check(user.0.as_ref())?;
    let input = into_object(body)?;

    let row = service::<E>(&state)?.create(&user.context(), &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /{resource}/{id}
///
/// Partial update: absent fields keep their values.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Extension(policy): Extension<AccessPolicy>,
    user: MaybeUser,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<E>> {
    policy.write.check(user.0.as_ref())?;
    let input = into_object(body)?;
    if input.contains_key("deleted_at") {
        // Restoring or trashing through an update follows the delete rules.
        policy.delete_access().check(user.0.as_ref())?;
    }

    service::<E>(&state)?
        .update(&user.context(), id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<E>(id))
}

/// DELETE /{resource}/{id}
///
/// Soft delete. Returns 204 No Content, or 404 when no live row matches.
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Extension(policy): Extension<AccessPolicy>,
    user: MaybeUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    policy.delete_access().check(user.0.as_ref())?;

    let deleted = service::<E>(&state)?
        .soft_delete(&user.context(), id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<E>(id))
    }
}

/// POST /{resource}/{id}/restore
///
/// Returns 204 No Content, or 404 when no soft-deleted row matches.
pub async fn restore<E: Entity>(
    State(state): State<AppState>,
    Extension(policy): Extension<AccessPolicy>,
    user: MaybeUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    policy.delete_access().check(user.0.as_ref())?;

    let restored = service::<E>(&state)?.restore(&user.context(), id).await?;
    if restored {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<E>(id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn service<E: Entity>(state: &AppState) -> AppResult<Arc<EntityService<E>>> {
    state.services.get::<E>().ok_or_else(|| {
        AppError::InternalError(format!(
            "No service registered for {}",
            E::schema().entity
        ))
    })
}

fn not_found<E: Entity>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: E::schema().entity,
        id,
    })
}

fn into_object(body: Value) -> AppResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".into(),
        )),
    }
}
