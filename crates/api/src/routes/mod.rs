pub mod auth;
pub mod entity;
pub mod health;

use academy_db::models::{
    Contact, JobOffer, KeyCompetency, Module, Testimonial, Training, TrainingKeyCompetency,
    TrainingModule, User,
};
use axum::Router;

use crate::middleware::rbac::AccessPolicy;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user (requires auth)
///
/// /contacts                                        submit (public); read/manage (staff)
/// /job-offers                                      read (public); manage (staff)
/// /modules                                         read (public); manage (staff)
/// /key-competencies                                read (public); manage (staff)
/// /trainings                                       read (public); manage (staff)
/// /training-modules                                read (public); manage (staff)
/// /training-key-competencies                       read (public); manage (staff)
/// /testimonials                                    read (public); manage (staff)
/// /users                                           admin only
/// ```
///
/// Every entity resource exposes the same operations, see [`entity::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Entity resources.
        .nest("/contacts", entity::router::<Contact>(AccessPolicy::SUBMISSIONS))
        .nest("/job-offers", entity::router::<JobOffer>(AccessPolicy::CATALOG))
        .nest("/modules", entity::router::<Module>(AccessPolicy::CATALOG))
        .nest(
            "/key-competencies",
            entity::router::<KeyCompetency>(AccessPolicy::CATALOG),
        )
        .nest("/trainings", entity::router::<Training>(AccessPolicy::CATALOG))
        .nest(
            "/training-modules",
            entity::router::<TrainingModule>(AccessPolicy::CATALOG),
        )
        .nest(
            "/training-key-competencies",
            entity::router::<TrainingKeyCompetency>(AccessPolicy::CATALOG),
        )
        .nest("/testimonials", entity::router::<Testimonial>(AccessPolicy::CATALOG))
        .nest("/users", entity::router::<User>(AccessPolicy::ADMIN_ONLY))
}
