//! Service layer: validation gate, hooks and the service container.

pub mod container;
pub mod context;
pub mod entity_service;
pub mod error;
pub mod hooks;

pub use container::{ContainerError, ServiceContainer, ServiceContainerBuilder};
pub use context::RequestContext;
pub use entity_service::EntityService;
pub use error::{ServiceError, ServiceResult};
pub use hooks::{EntityHooks, NoHooks, UserHooks};
