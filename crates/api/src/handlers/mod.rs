pub mod auth;
pub mod entity;
