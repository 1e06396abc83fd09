//! Validation engine.
//!
//! `validate(schema, input)` walks every declared field without
//! short-circuiting, so a caller gets the complete list of violations in one
//! pass. On success the output holds only declared fields, defaults applied.
//! No coercion happens: a string where a number is expected is a violation.

use super::constraint::{value_type_name, ArrayConstraint, Constraint};
use super::object::Schema;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Violations
// =============================================================================

/// A single field-level failure. `path` is dot-delimited (`filters.cost_from`,
/// `domains.1`); empty for the root value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every violation found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(Violation::to_string).collect();
        write!(f, "{}", joined.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Engine
// =============================================================================

/// Validate `input` against `schema`, returning the normalized object.
pub fn validate(schema: &Schema, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
    let mut violations = Vec::new();
    match check_object(schema, input, "", &mut violations) {
        Some(normalized) if violations.is_empty() => Ok(normalized),
        _ => Err(ValidationErrors(violations)),
    }
}

/// Check every declared default against its own constraint, nested object
/// schemas included.
pub(crate) fn verify_defaults(schema: &Schema) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();
    collect_default_violations(schema, "", &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn collect_default_violations(schema: &Schema, path: &str, out: &mut Vec<Violation>) {
    for field in schema.fields() {
        let field_path = child_path(path, &field.name);
        if let Some(default) = &field.default {
            check_value(&field.constraint, default, &field_path, out);
        }
        collect_nested_defaults(&field.constraint, &field_path, out);
    }
}

fn collect_nested_defaults(constraint: &Constraint, path: &str, out: &mut Vec<Violation>) {
    match constraint {
        Constraint::Object(schema) => collect_default_violations(schema, path, out),
        Constraint::Array(rule) => collect_nested_defaults(&rule.items, path, out),
        Constraint::OneOf(alternatives) => {
            for alternative in alternatives {
                collect_nested_defaults(alternative, path, out);
            }
        }
        Constraint::String(_) | Constraint::Number(_) | Constraint::Boolean => {}
    }
}

pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

fn type_mismatch(expected: &str, value: &Value, path: &str, out: &mut Vec<Violation>) {
    out.push(Violation::new(
        path,
        format!("Expected {}, received {}", expected, value_type_name(value)),
    ));
}

/// Check one value; returns its normalized form when it produced no
/// violations.
fn check_value(
    constraint: &Constraint,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    match constraint {
        Constraint::String(rule) => {
            let Some(s) = value.as_str() else {
                type_mismatch(constraint.expected_type(), value, path, out);
                return None;
            };
            match rule.check(s) {
                Ok(()) => Some(value.clone()),
                Err(message) => {
                    out.push(Violation::new(path, message));
                    None
                }
            }
        }
        Constraint::Number(rule) => {
            let Value::Number(n) = value else {
                type_mismatch(constraint.expected_type(), value, path, out);
                return None;
            };
            match rule.check(n) {
                Ok(()) => Some(value.clone()),
                Err(message) => {
                    out.push(Violation::new(path, message));
                    None
                }
            }
        }
        Constraint::Boolean => {
            if value.is_boolean() {
                Some(value.clone())
            } else {
                type_mismatch("boolean", value, path, out);
                None
            }
        }
        Constraint::Array(rule) => check_array(rule, value, path, out),
        Constraint::Object(schema) => check_object(schema, value, path, out).map(Value::Object),
        Constraint::OneOf(alternatives) => check_one_of(alternatives, value, path, out),
    }
}

fn check_array(
    rule: &ArrayConstraint,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(items) = value.as_array() else {
        type_mismatch("array", value, path, out);
        return None;
    };

    let start = out.len();
    let normalized: Vec<Value> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            check_value(&rule.items, item, &child_path(path, &i.to_string()), out)
        })
        .collect();

    // Uniqueness is judged on normalized elements, so only once they are valid.
    if out.len() == start {
        if let Err(message) = rule.check(&normalized) {
            out.push(Violation::new(path, message));
        }
    }

    (out.len() == start).then_some(Value::Array(normalized))
}

fn check_object(
    schema: &Schema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Map<String, Value>> {
    let Some(input) = value.as_object() else {
        type_mismatch("object", value, path, out);
        return None;
    };

    let start = out.len();
    let mut normalized = Map::new();

    for field in schema.fields() {
        let field_path = child_path(path, &field.name);
        match input.get(&field.name) {
            Some(v) => {
                if let Some(n) = check_value(&field.constraint, v, &field_path, out) {
                    normalized.insert(field.name.clone(), n);
                }
            }
            None => {
                if let Some(default) = &field.default {
                    if let Some(n) = check_value(&field.constraint, default, &field_path, out) {
                        normalized.insert(field.name.clone(), n);
                    }
                } else if field.required {
                    out.push(Violation::new(field_path, "Required"));
                }
            }
        }
    }

    if out.len() == start {
        for refinement in schema.refinements() {
            refinement.check(&normalized, path, out);
        }
    }

    if schema.is_strict() {
        for key in input.keys().filter(|k| !schema.is_declared(k)) {
            out.push(Violation::new(child_path(path, key), "Unrecognized key"));
        }
    }

    (out.len() == start).then_some(normalized)
}

/// Try each alternative in order; the first clean match wins. When none
/// matches, report the alternative with the fewest violations (earliest on a
/// tie) as the closest failure.
fn check_one_of(
    alternatives: &[Constraint],
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let mut closest: Option<Vec<Violation>> = None;

    for alternative in alternatives {
        let mut attempt = Vec::new();
        if let Some(normalized) = check_value(alternative, value, path, &mut attempt) {
            if attempt.is_empty() {
                return Some(normalized);
            }
        }
        if closest.as_ref().map_or(true, |c| attempt.len() < c.len()) {
            closest = Some(attempt);
        }
    }

    match closest {
        Some(violations) if !violations.is_empty() => out.extend(violations),
        _ => out.push(Violation::new(path, "Invalid input, no alternative shape declared")),
    }
    None
}

// =============================================================================
// Tests
// =============================================================================
