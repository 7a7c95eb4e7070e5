//! Errors returned by the service layer.

use academy_core::error::CoreError;
use academy_core::validation::ValidationError;

/// A failed service operation.
///
/// `Core` covers rejections raised before persistence (validation, hooks);
/// `Persistence` wraps whatever the database reported.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
