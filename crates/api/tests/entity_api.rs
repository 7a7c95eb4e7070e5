//! HTTP-level integration tests for the generic entity endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use academy_core::roles::{ROLE_EDITOR, ROLE_VIEWER};
use academy_core::types::new_id;
use axum::http::StatusCode;
use common::{
    body_json, create_user, delete, delete_auth, get, get_auth, post_auth, post_json,
    post_json_auth, put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contact_body() -> Value {
    json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "grace@example.com",
        "subject": "registration",
        "message": "I would like to enrol.",
    })
}

fn training_body(slug: &str) -> Value {
    json!({
        "title": "Rust for backend developers",
        "slug": slug,
        "format": "hybrid",
        "price": 1490.0,
    })
}

async fn create_training(pool: &PgPool, token: &str, slug: &str) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/trainings",
        training_body(slug),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_training_returns_201(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    let json = create_training(&pool, &token, "rust-backend").await;

    assert_eq!(json["title"], "Rust for backend developers");
    assert_eq!(json["slug"], "rust-backend");
    assert_eq!(json["is_published"], false);
    assert!(json["id"].is_string());
    assert_eq!(json["created_at"], json["updated_at"]);
    assert!(json["deleted_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_contact_submission_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/contacts", contact_body()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "grace@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_body_returns_400_with_violations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = contact_body();
    body["email"] = json!("not-an-email");
    body["subject"] = json!("complaint");
    let response = post_json(app, "/api/v1/contacts", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"subject"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_future_created_at_is_rejected(pool: PgPool) {
    let mut body = contact_body();
    body["created_at"] = json!("2099-01-01T00:00:00Z");
    let response = post_json(common::build_test_app(pool), "/api/v1/contacts", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["violations"][0]["field"], "created_at");
    assert_eq!(json["violations"][0]["reason"], "in_future");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_object_body_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/contacts", json!([1, 2, 3])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_returns_409(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    create_training(&pool, &token, "dup").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/trainings",
        training_body("dup"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dangling_reference_returns_400(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/training-key-competencies",
        json!({
            "training_id": new_id().to_string(),
            "key_competency_id": new_id().to_string(),
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_staff_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/trainings", training_body("anon")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_staff_route_with_viewer_returns_403(pool: PgPool) {
    let (_, token) = create_user(&pool, "viewer@example.com", ROLE_VIEWER).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/trainings",
        training_body("viewer"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(common::build_test_app(pool), "/api/v1/contacts", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_token_returns_401_even_on_public_route(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/trainings", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Read / update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/modules/{}", new_id())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_is_partial(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    let created = create_training(&pool, &token, "partial").await;
    let id = created["id"].as_str().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/trainings/{id}"),
        json!({ "is_published": true, "summary": "Ship production services" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["is_published"], true);
    assert_eq!(json["summary"], "Ship production services");
    assert_eq!(json["title"], created["title"]);
    assert_eq!(json["created_at"], created["created_at"]);
    assert_ne!(json["updated_at"], created["updated_at"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_returns_404(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/trainings/{}", new_id()),
        json!({ "title": "Ghost" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Soft delete / restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_lifecycle(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    let created = create_training(&pool, &token, "lifecycle").await;
    let uri = format!("/api/v1/trainings/{}", created["id"].as_str().unwrap());
    let app = || common::build_test_app(pool.clone());

    assert_eq!(delete(app(), &uri).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(delete_auth(app(), &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(app(), &uri, &token).await.status(), StatusCode::NOT_FOUND);

    let trashed_uri = format!("{uri}?includeDeleted=true");
    assert_eq!(get(app(), &trashed_uri).await.status(), StatusCode::UNAUTHORIZED);
    let response = get_auth(app(), &trashed_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["deleted_at"].is_string());

    let restore_uri = format!("{uri}/restore");
    assert_eq!(post_auth(app(), &restore_uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(post_auth(app(), &restore_uri, &token).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(app(), &uri).await.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_paginates_and_filters(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    for (title, level) in [
        ("Ownership", "beginner"),
        ("Lifetimes", "intermediate"),
        ("Async", "advanced"),
    ] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/modules",
            json!({ "title": title, "duration_hours": 2, "level": level }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(common::build_test_app(pool.clone()), "/api/v1/modules?pageSize=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["rows"].as_array().unwrap().len(), 2);
    assert_eq!(json["rows"][0]["title"], "Async");

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/modules?level=intermediate&sortBy=title",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["rows"][0]["title"], "Lifetimes");

    let response = get(common::build_test_app(pool), "/api/v1/modules?search=own").await;
    assert_eq!(body_json(response).await["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_query_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/modules?pageSize=0&sortOrder=sideways").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["violations"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_typed_filter_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/trainings?is_published=maybe&price=cheap").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect();
    assert_eq!(fields, ["is_published", "price"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_populate_children_on_training(pool: PgPool) {
    let (_, token) = create_user(&pool, "editor@example.com", ROLE_EDITOR).await;
    let training = create_training(&pool, &token, "children").await;

    let module = body_json(
        post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/modules",
            json!({ "title": "Traits", "duration_hours": 4, "level": "intermediate" }),
            &token,
        )
        .await,
    )
    .await;

    let link = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/training-modules",
        json!({ "training_id": training["id"], "module_id": module["id"], "position": 1 }),
        &token,
    )
    .await;
    assert_eq!(link.status(), StatusCode::CREATED);

    let uri = format!("/api/v1/trainings/{}", training["id"].as_str().unwrap());
    let plain = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;
    assert!(plain.get("modules").is_none());

    let populated = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("{uri}?populateChildren=true"),
        )
        .await,
    )
    .await;
    assert_eq!(populated["modules"][0]["title"], "Traits");
    assert_eq!(populated["key_competencies"], json!([]));

    let listed = body_json(
        get(
            common::build_test_app(pool),
            "/api/v1/trainings?populateChildren=true",
        )
        .await,
    )
    .await;
    assert_eq!(listed["rows"][0]["modules"][0]["title"], "Traits");
}
