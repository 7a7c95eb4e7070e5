//! Integration tests for soft-delete and restore behaviour.
//!
//! Verifies that:
//! - Soft-deleted rows are hidden from `Visibility::Active` reads and default lists
//! - `Visibility::WithDeleted` and `include_deleted` still reach them
//! - A second soft delete returns `false`
//! - Restoring makes the row visible again
//! - Soft-deleted rows cannot be updated unless the update restores them

use academy_core::query::{PaginationQuery, Visibility};
use academy_core::validation::{validate, DtoMode};
use academy_db::models::{Entity, KeyCompetency};
use academy_db::repositories::{EntityRepo, Repository};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_competency(repo: &EntityRepo<KeyCompetency>, name: &str) -> KeyCompetency {
    let Value::Object(input) = json!({ "name": name, "description": "soft delete test" }) else {
        unreachable!();
    };
    let dto = validate(KeyCompetency::schema(), DtoMode::Create, &input).unwrap();
    repo.create(&dto).await.unwrap()
}

// ---------------------------------------------------------------------------
// Test: soft_delete hides entity from find_by_id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_from_find_by_id(pool: PgPool) {
    let repo = EntityRepo::<KeyCompetency>::new(pool);
    let row = create_competency(&repo, "Hidden").await;

    let deleted = repo.soft_delete(row.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let active = repo.find_by_id(row.id, Visibility::Active, false).await.unwrap();
    assert!(active.is_none(), "Active read should skip soft-deleted rows");

    let trashed = repo
        .find_by_id(row.id, Visibility::WithDeleted, false)
        .await
        .unwrap()
        .expect("WithDeleted read should return the row");
    assert!(trashed.row.deleted_at.is_some());
    assert!(trashed.row.updated_at >= trashed.row.created_at);
}

// ---------------------------------------------------------------------------
// Test: soft_delete hides entity from list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_from_list(pool: PgPool) {
    let repo = EntityRepo::<KeyCompetency>::new(pool);
    let kept = create_competency(&repo, "Kept").await;
    let gone = create_competency(&repo, "Gone").await;
    repo.soft_delete(gone.id).await.unwrap();

    let page = repo.list(&PaginationQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].row.id, kept.id);

    let with_deleted = PaginationQuery {
        include_deleted: true,
        ..PaginationQuery::default()
    };
    let page = repo.list(&with_deleted).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.rows.iter().any(|r| r.row.id == gone.id));
}

// ---------------------------------------------------------------------------
// Test: soft delete is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_soft_delete_returns_false(pool: PgPool) {
    let repo = EntityRepo::<KeyCompetency>::new(pool);
    let row = create_competency(&repo, "Twice").await;

    assert!(repo.soft_delete(row.id).await.unwrap());
    assert!(
        !repo.soft_delete(row.id).await.unwrap(),
        "second soft_delete should return false"
    );
}

// ---------------------------------------------------------------------------
// Test: restore makes entity visible again
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_makes_visible_again(pool: PgPool) {
    let repo = EntityRepo::<KeyCompetency>::new(pool);
    let row = create_competency(&repo, "Restore Me").await;

    assert!(
        !repo.restore(row.id).await.unwrap(),
        "restoring a live row should return false"
    );

    repo.soft_delete(row.id).await.unwrap();
    assert!(repo.restore(row.id).await.unwrap(), "restore should return true");

    let found = repo
        .find_by_id(row.id, Visibility::Active, false)
        .await
        .unwrap()
        .expect("row should be visible after restore");
    assert_eq!(found.row.name, "Restore Me");
    assert!(found.row.deleted_at.is_none());
}

// ---------------------------------------------------------------------------
// Test: updates skip trashed rows unless they restore them
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_ignores_soft_deleted_rows(pool: PgPool) {
    let repo = EntityRepo::<KeyCompetency>::new(pool);
    let row = create_competency(&repo, "Trashed").await;
    repo.soft_delete(row.id).await.unwrap();

    let Value::Object(rename) = json!({ "name": "Renamed" }) else {
        unreachable!();
    };
    let dto = validate(KeyCompetency::schema(), DtoMode::Update, &rename).unwrap();
    assert!(repo.update(row.id, &dto).await.unwrap().is_none());

    let Value::Object(restore) = json!({ "name": "Renamed", "deleted_at": null }) else {
        unreachable!();
    };
    let dto = validate(KeyCompetency::schema(), DtoMode::Update, &restore).unwrap();
    let restored = repo.update(row.id, &dto).await.unwrap().expect("update restores");
    assert_eq!(restored.name, "Renamed");
    assert!(restored.deleted_at.is_none());
}
