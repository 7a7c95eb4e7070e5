//! Caller identity passed to mutating service operations.

use academy_core::roles::{is_staff, ROLE_ADMIN};
use academy_core::types::DbId;

/// Who is performing an operation.
///
/// Anonymous callers (public contact form) carry neither id nor role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<DbId>,
    pub role: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(role.into()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }

    pub fn is_staff(&self) -> bool {
        self.role.as_deref().is_some_and(is_staff)
    }
}
