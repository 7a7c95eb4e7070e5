use std::sync::Arc;

use academy_db::services::{ContainerError, ServiceContainer};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: academy_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Entity services, registered once at startup.
    pub services: Arc<ServiceContainer>,
}

impl AppState {
    /// Build the state and register every entity service against `pool`.
    pub fn new(pool: academy_db::DbPool, config: ServerConfig) -> Result<Self, ContainerError> {
        let services = ServiceContainer::from_pool(&pool)?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
