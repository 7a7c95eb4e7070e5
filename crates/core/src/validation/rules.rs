//! Field declarations, constraint types and violation reporting.

use std::fmt;

use serde::Serialize;

/// Primitive type a DTO field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Integral JSON number.
    Integer,
    /// Any JSON number.
    Number,
    Boolean,
    /// RFC 3339 string.
    Timestamp,
    /// UUID string.
    Uuid,
    /// Write-only string (e.g. a password). Never persisted under its own
    /// name, never filterable, sortable or searchable.
    Secret,
}

impl FieldKind {
    /// Whether values of this kind are matched by substring rather than equality.
    pub fn is_textual(self) -> bool {
        matches!(self, FieldKind::Text)
    }
}

/// A single declarative constraint attached to a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Closed set of allowed literal values.
    OneOf(&'static [&'static str]),
    /// Must look like an email address.
    Email,
    /// Minimum length in characters.
    MinLength(usize),
    /// Maximum length in characters.
    MaxLength(usize),
    /// Inclusive numeric lower bound.
    Min(f64),
    /// Inclusive numeric upper bound.
    Max(f64),
    /// Regular expression the whole value must match.
    Pattern(&'static str),
    /// Timestamp no later than the moment of validation.
    NotInFuture,
}

/// Declaration of one DTO field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Required at creation. Every field is optional on update.
    pub required: bool,
    pub constraints: &'static [Constraint],
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            constraints: &[],
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            constraints: &[],
        }
    }

    /// Attach constraints to the field.
    pub const fn with(self, constraints: &'static [Constraint]) -> Self {
        Self {
            constraints,
            ..self
        }
    }
}

/// Machine-readable reason for a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    Required,
    InvalidType,
    NotInEnum,
    InvalidEmail,
    TooShort,
    TooLong,
    BelowMin,
    AboveMax,
    PatternMismatch,
    InFuture,
    InvalidValue,
}

impl ViolationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationReason::Required => "required",
            ViolationReason::InvalidType => "invalid_type",
            ViolationReason::NotInEnum => "not_in_enum",
            ViolationReason::InvalidEmail => "invalid_email",
            ViolationReason::TooShort => "too_short",
            ViolationReason::TooLong => "too_long",
            ViolationReason::BelowMin => "below_min",
            ViolationReason::AboveMax => "above_max",
            ViolationReason::PatternMismatch => "pattern_mismatch",
            ViolationReason::InFuture => "in_future",
            ViolationReason::InvalidValue => "invalid_value",
        }
    }
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: ViolationReason,
    pub message: String,
}

/// One or more field-level constraint violations.
///
/// Always non-empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// A validation error carrying exactly one violation.
    pub fn single(field: &str, reason: ViolationReason, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(field, reason, message);
        error
    }

    pub fn push(&mut self, field: &str, reason: ViolationReason, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            reason,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// `Ok(value)` when no violation was collected, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
