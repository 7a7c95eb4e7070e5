//! Data validation engine.
//!
//! Entity DTO shapes are declared as static [`EntitySchema`] values and
//! interpreted by a single generic [`validate`] function. Pure logic, no
//! database dependencies.

pub mod dto;
pub mod evaluator;
pub mod rules;
pub mod schema;

pub use dto::{Dto, DtoMode, FieldValue};
pub use evaluator::{compile_patterns, parse_filter_value, validate};
pub use rules::{Constraint, FieldKind, FieldSpec, FieldViolation, ValidationError, ViolationReason};
pub use schema::{EntitySchema, Relation};
