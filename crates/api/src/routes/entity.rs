//! Route template shared by every entity resource.

use academy_db::models::Entity;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::handlers::entity;
use crate::middleware::rbac::AccessPolicy;
use crate::state::AppState;

/// Verbs answered by [`router`], and so the only ones CORS allows.
pub const METHODS: &[Method] = &[Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Routes for one entity resource, guarded by `policy`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete (soft)
/// POST   /{id}/restore    -> restore
/// ```
pub fn router<E: Entity>(policy: AccessPolicy) -> Router<AppState> {
    Router::new()
        .route("/", get(entity::list::<E>).post(entity::create::<E>))
        .route(
            "/{id}",
            get(entity::get_by_id::<E>)
                .put(entity::update::<E>)
                .delete(entity::delete::<E>),
        )
        .route("/{id}/restore", post(entity::restore::<E>))
        .layer(Extension(policy))
}
