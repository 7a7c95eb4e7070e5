//! First-run administrator provisioning.

use academy_core::roles::ROLE_ADMIN;
use academy_db::models::User;
use academy_db::repositories::UserRepo;
use academy_db::services::RequestContext;
use serde_json::{Map, Value};

use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create the configured administrator unless a live admin already exists.
///
/// Goes through the regular user service, so the credentials are validated
/// and the password hashed like any other user. Returns the created user,
/// or `None` when nothing had to be done.
pub async fn ensure_admin(state: &AppState, admin: &AdminBootstrap) -> AppResult<Option<User>> {
    if UserRepo::count_with_role(&state.pool, ROLE_ADMIN).await? > 0 {
        return Ok(None);
    }

    let service = state
        .services
        .get::<User>()
        .ok_or_else(|| AppError::InternalError("No service registered for User".into()))?;

    let mut input = Map::new();
    input.insert("email".into(), Value::from(admin.email.as_str()));
    input.insert("password".into(), Value::from(admin.password.as_str()));
    input.insert("first_name".into(), Value::from("Admin"));
    input.insert("last_name".into(), Value::from("Academy"));
    input.insert("role".into(), Value::from(ROLE_ADMIN));

    let user = service.create(&RequestContext::anonymous(), &input).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "Bootstrapped administrator account");
    Ok(Some(user))
}
