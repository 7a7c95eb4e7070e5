//! Schema evaluator. Pure logic, no database access.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::dto::{Dto, DtoMode, FieldValue};
use super::rules::{Constraint, FieldKind, FieldSpec, ValidationError, ViolationReason};
use super::schema::EntitySchema;

/// Validate a raw input object against an entity schema.
///
/// Runs every field and every constraint and reports all violations at once.
/// On success the returned [`Dto`] holds only declared fields (plus the audit
/// overrides allowed by `mode`); undeclared input keys are dropped.
pub fn validate(
    schema: &EntitySchema,
    mode: DtoMode,
    input: &Map<String, Value>,
) -> Result<Dto, ValidationError> {
    let mut dto = Dto::new();
    let mut errors = ValidationError::default();

    for spec in schema.fields.iter().chain(mode.audit_overrides()) {
        let raw = input.get(spec.name);

        if is_blank(raw) {
            let explicit_null = matches!(raw, Some(Value::Null));
            let blanked = matches!(raw, Some(Value::String(_)));
            if mode == DtoMode::Update && spec.name == "deleted_at" && explicit_null {
                dto.insert(spec.name, FieldValue::Null);
            } else if spec.required && (mode == DtoMode::Create || blanked) {
                // On update a required field may be omitted but never blanked.
                errors.push(spec.name, ViolationReason::Required, "is required");
            }
            continue;
        }

        // `is_blank` returned false, so the value is present.
        let Some(raw) = raw else { continue };

        let value = match coerce(spec.kind, raw) {
            Some(v) => v,
            None => {
                errors.push(
                    spec.name,
                    ViolationReason::InvalidType,
                    format!("must be {}", kind_label(spec.kind)),
                );
                continue;
            }
        };

        let before = errors.violations.len();
        for constraint in spec.constraints {
            check_constraint(spec, constraint, &value, &mut errors);
        }
        if errors.violations.len() == before {
            dto.insert(spec.name, value);
        }
    }

    errors.into_result(dto)
}

/// Compiled `Constraint::Pattern` expressions, keyed by source.
static PATTERNS: LazyLock<RwLock<HashMap<&'static str, Regex>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Compile every pattern declared by `schema` into the shared cache.
///
/// Called once per schema when its service is registered, so a malformed
/// pattern stops startup instead of surfacing on the first request.
pub fn compile_patterns(schema: &EntitySchema) -> Result<(), regex::Error> {
    for spec in schema.fields {
        for constraint in spec.constraints {
            if let Constraint::Pattern(pattern) = constraint {
                compiled(pattern)?;
            }
        }
    }
    Ok(())
}

fn compiled(pattern: &'static str) -> Result<Regex, regex::Error> {
    if let Some(re) = PATTERNS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    PATTERNS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(pattern, re.clone());
    Ok(re)
}

/// Parse a query-string filter value into the typed value of its column.
///
/// Text columns keep the raw string. Returns `None` when the value does not
/// parse as the column kind.
pub fn parse_filter_value(kind: FieldKind, raw: &str) -> Option<FieldValue> {
    let raw = raw.trim();
    match kind {
        FieldKind::Text | FieldKind::Secret => Some(FieldValue::Text(raw.to_string())),
        FieldKind::Integer => raw.parse().ok().map(FieldValue::Integer),
        FieldKind::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FieldValue::Number),
        FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(FieldValue::Boolean(true)),
            "false" | "0" => Some(FieldValue::Boolean(false)),
            _ => None,
        },
        FieldKind::Timestamp | FieldKind::Uuid => coerce(kind, &Value::from(raw)),
    }
}

/// Missing, `null`, or a whitespace-only string.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce(kind: FieldKind, value: &Value) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => value.as_str().map(|s| FieldValue::Text(s.trim().to_string())),
        FieldKind::Secret => value.as_str().map(|s| FieldValue::Text(s.to_string())),
        FieldKind::Integer => value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(FieldValue::Integer),
        FieldKind::Number => value.as_f64().map(FieldValue::Number),
        FieldKind::Boolean => value.as_bool().map(FieldValue::Boolean),
        FieldKind::Timestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc))),
        FieldKind::Uuid => value
            .as_str()
            .and_then(|s| uuid::Uuid::parse_str(s.trim()).ok())
            .map(FieldValue::Uuid),
    }
}

pub(crate) fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Secret => "a string",
        FieldKind::Integer => "an integer",
        FieldKind::Number => "a number",
        FieldKind::Boolean => "a boolean",
        FieldKind::Timestamp => "an RFC 3339 timestamp",
        FieldKind::Uuid => "a UUID",
    }
}

fn check_constraint(
    spec: &FieldSpec,
    constraint: &Constraint,
    value: &FieldValue,
    errors: &mut ValidationError,
) {
    let number = match value {
        FieldValue::Integer(n) => Some(*n as f64),
        FieldValue::Number(n) => Some(*n),
        _ => None,
    };

    match (constraint, value) {
        (Constraint::OneOf(allowed), FieldValue::Text(s)) => {
            if !allowed.contains(&s.as_str()) {
                errors.push(
                    spec.name,
                    ViolationReason::NotInEnum,
                    format!("must be one of: {}", allowed.join(", ")),
                );
            }
        }
        (Constraint::Email, FieldValue::Text(s)) => {
            if !s.validate_email() {
                errors.push(
                    spec.name,
                    ViolationReason::InvalidEmail,
                    "must be a valid email address",
                );
            }
        }
        (Constraint::MinLength(min), FieldValue::Text(s)) => {
            if s.chars().count() < *min {
                errors.push(
                    spec.name,
                    ViolationReason::TooShort,
                    format!("must be at least {min} characters"),
                );
            }
        }
        (Constraint::MaxLength(max), FieldValue::Text(s)) => {
            if s.chars().count() > *max {
                errors.push(
                    spec.name,
                    ViolationReason::TooLong,
                    format!("must be at most {max} characters"),
                );
            }
        }
        (Constraint::Pattern(pattern), FieldValue::Text(s)) => match compiled(pattern) {
            Ok(re) if re.is_match(s) => {}
            Ok(_) => {
                errors.push(
                    spec.name,
                    ViolationReason::PatternMismatch,
                    format!("must match {pattern}"),
                );
            }
            Err(err) => {
                errors.push(
                    spec.name,
                    ViolationReason::PatternMismatch,
                    format!("cannot be checked against invalid pattern {pattern}: {err}"),
                );
            }
        },
        (Constraint::NotInFuture, FieldValue::Timestamp(t)) => {
            if *t > Utc::now() {
                errors.push(spec.name, ViolationReason::InFuture, "must not be in the future");
            }
        }
        (Constraint::Min(min), _) => {
            if number.is_some_and(|n| n < *min) {
                errors.push(
                    spec.name,
                    ViolationReason::BelowMin,
                    format!("must be at least {min}"),
                );
            }
        }
        (Constraint::Max(max), _) => {
            if number.is_some_and(|n| n > *max) {
                errors.push(
                    spec.name,
                    ViolationReason::AboveMax,
                    format!("must be at most {max}"),
                );
            }
        }
        // String constraints do not apply to non-string kinds.
        _ => {}
    }
}
