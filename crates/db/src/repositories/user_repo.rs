//! Dedicated lookups on the `users` table that the generic repository does not cover.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, first_name, last_name, role, password_hash, \
                       created_at, updated_at, deleted_at";

/// Authentication lookups for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a live user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE lower(email) = lower($1) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Find a live user by ID, including the password hash.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of live users holding `role`.
    pub async fn count_with_role(pool: &PgPool, role: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE role = $1 AND deleted_at IS NULL",
        )
        .bind(role)
        .fetch_one(pool)
        .await
    }
}
