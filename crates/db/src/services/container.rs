//! Dependency-injection container holding one service per entity type.
//!
//! The container is assembled once at startup and is read-only afterwards,
//! so lookups need no locking and every caller sees the same instances.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use academy_core::validation::compile_patterns;

use super::entity_service::EntityService;
use super::hooks::UserHooks;
use crate::models::{
    Contact, Entity, JobOffer, KeyCompetency, Module, Testimonial, Training,
    TrainingKeyCompetency, TrainingModule, User,
};
use crate::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("A service for {0} is already registered")]
    AlreadyRegistered(&'static str),

    #[error("Invalid field pattern in the {entity} schema: {source}")]
    InvalidPattern {
        entity: &'static str,
        source: regex::Error,
    },
}

type ServiceMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Immutable registry of [`EntityService`]s keyed by entity type.
pub struct ServiceContainer {
    services: ServiceMap,
}

impl ServiceContainer {
    pub fn builder() -> ServiceContainerBuilder {
        ServiceContainerBuilder {
            services: HashMap::new(),
        }
    }

    /// Register the Postgres-backed service of every entity.
    pub fn from_pool(pool: &DbPool) -> Result<Self, ContainerError> {
        Ok(Self::builder()
            .register(EntityService::<Contact>::with_pool(pool.clone()))?
            .register(EntityService::<JobOffer>::with_pool(pool.clone()))?
            .register(EntityService::<Module>::with_pool(pool.clone()))?
            .register(EntityService::<KeyCompetency>::with_pool(pool.clone()))?
            .register(EntityService::<Training>::with_pool(pool.clone()))?
            .register(EntityService::<TrainingModule>::with_pool(pool.clone()))?
            .register(EntityService::<TrainingKeyCompetency>::with_pool(pool.clone()))?
            .register(EntityService::<Testimonial>::with_pool(pool.clone()))?
            .register(EntityService::<User>::with_hooks(pool.clone(), UserHooks))?
            .build())
    }

    /// The service registered for `E`; the same `Arc` on every call.
    pub fn get<E: Entity>(&self) -> Option<Arc<EntityService<E>>> {
        self.services
            .get(&TypeId::of::<E>())
            .cloned()?
            .downcast::<EntityService<E>>()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("services", &self.services.len())
            .finish()
    }
}

/// Collects services before the container is frozen.
pub struct ServiceContainerBuilder {
    services: ServiceMap,
}

impl fmt::Debug for ServiceContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainerBuilder")
            .field("services", &self.services.len())
            .finish()
    }
}

impl ServiceContainerBuilder {
    /// Add the service for `E`. A second registration of the same type fails,
    /// as does a schema whose field patterns do not compile.
    pub fn register<E: Entity>(mut self, service: EntityService<E>) -> Result<Self, ContainerError> {
        let schema = E::schema();
        let key = TypeId::of::<E>();
        if self.services.contains_key(&key) {
            return Err(ContainerError::AlreadyRegistered(schema.entity));
        }
        compile_patterns(schema).map_err(|source| ContainerError::InvalidPattern {
            entity: schema.entity,
            source,
        })?;
        self.services.insert(key, Arc::new(service));
        Ok(self)
    }

    pub fn build(self) -> ServiceContainer {
        ServiceContainer {
            services: self.services,
        }
    }
}
