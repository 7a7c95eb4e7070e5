//! Liveness and readiness report, mounted at the root (not under `/api/v1`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` when the API can serve entity requests, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    /// Entity services registered in the container.
    pub services: usize,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Newest applied migration; `None` before the first migration run.
    pub schema_version: Option<i64>,
}

/// GET /health
///
/// Answers 503 while degraded so load balancers take the instance out.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let reachable = academy_db::health_check(&state.pool).await.is_ok();
    let schema_version = if reachable {
        academy_db::schema_version(&state.pool).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Could not read schema version");
            None
        })
    } else {
        None
    };
    let services = state.services.len();

    let ready = reachable && schema_version.is_some() && services > 0;
    let (code, status) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: DatabaseHealth {
                reachable,
                schema_version,
            },
            services,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
