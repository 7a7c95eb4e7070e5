//! Role-based access control (RBAC) for entity routes.
//!
//! Each entity router carries an [`AccessPolicy`] as a request extension;
//! the generic handlers check the caller against it before touching the
//! service.

use academy_core::error::CoreError;
use academy_core::roles::{is_staff, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;

/// Minimum caller required for an operation, from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    Authenticated,
    /// `admin` or `editor`.
    Staff,
    Admin,
}

impl Access {
    /// Rejects with 401 when a caller is required but absent, 403 when the
    /// caller's role is insufficient.
    pub fn check(self, user: Option<&AuthUser>) -> Result<(), AppError> {
        let Some(user) = user else {
            if self == Access::Public {
                return Ok(());
            }
            return Err(AppError::Core(CoreError::Unauthorized(
                "Authentication required".into(),
            )));
        };

        let allowed = match self {
            Access::Public | Access::Authenticated => true,
            Access::Staff => is_staff(&user.role),
            Access::Admin => user.role == ROLE_ADMIN,
        };
        if allowed {
            return Ok(());
        }

        let message = match self {
            Access::Admin => "Admin role required",
            _ => "Admin or Editor role required",
        };
        Err(AppError::Core(CoreError::Forbidden(message.into())))
    }
}

/// Access requirements of one entity resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// List and get.
    pub read: Access,
    pub create: Access,
    /// Update, delete and restore.
    pub write: Access,
}

impl AccessPolicy {
    /// Publicly readable, staff-managed content.
    pub const CATALOG: Self = Self {
        read: Access::Public,
        create: Access::Staff,
        write: Access::Staff,
    };

    /// Anyone may submit; only staff may read or manage submissions.
    pub const SUBMISSIONS: Self = Self {
        read: Access::Staff,
        create: Access::Public,
        write: Access::Staff,
    };

    pub const ADMIN_ONLY: Self = Self {
        read: Access::Admin,
        create: Access::Admin,
        write: Access::Admin,
    };

    /// Reads that include soft-deleted rows always need staff.
    pub fn read_access(&self, include_deleted: bool) -> Access {
        if include_deleted {
            self.read.max(Access::Staff)
        } else {
            self.read
        }
    }

    /// Soft delete and restore always need staff.
    pub fn delete_access(&self) -> Access {
        self.write.max(Access::Staff)
    }
}
