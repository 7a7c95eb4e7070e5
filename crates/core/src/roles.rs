//! Well-known role name constants.
//!
//! These must match the `role` check constraint in `20260301000009_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// Every role a user may hold.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER];

/// Whether the role may manage back-office content (admin or editor).
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}
