//! Constraint primitives: the atomic rules every parameter schema is built from.
//!
//! Primitives report, they never fail: each check returns `Ok(())` or a single
//! human-readable violation message. Composite constraints (objects, arrays,
//! unions) are walked by the validation engine, which owns path bookkeeping.

use super::object::Schema;
use crate::types::{Error, Result};
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::sync::Arc;

// =============================================================================
// Constraint
// =============================================================================

/// A rule over a single JSON value.
#[derive(Debug, Clone)]
pub enum Constraint {
    String(StringConstraint),
    Number(NumberConstraint),
    Boolean,
    Array(ArrayConstraint),
    Object(Arc<Schema>),
    /// Alternative shapes, tried in declared order.
    OneOf(Vec<Constraint>),
}

impl Constraint {
    pub fn string() -> StringConstraint {
        StringConstraint::default()
    }

    /// String restricted to a fixed set of values.
    pub fn enumeration<I, S>(values: I) -> StringConstraint
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StringConstraint::default().one_of(values)
    }

    pub fn number() -> NumberConstraint {
        NumberConstraint::default()
    }

    pub fn integer() -> NumberConstraint {
        NumberConstraint {
            integer: true,
            ..NumberConstraint::default()
        }
    }

    pub fn boolean() -> Self {
        Constraint::Boolean
    }

    pub fn array(items: impl Into<Constraint>) -> ArrayConstraint {
        ArrayConstraint::new(items.into())
    }

    pub fn object(schema: Schema) -> Self {
        Constraint::Object(Arc::new(schema))
    }

    pub fn one_of(alternatives: Vec<Constraint>) -> Self {
        Constraint::OneOf(alternatives)
    }

    /// Name of the JSON type this constraint expects, for messages.
    pub(crate) fn expected_type(&self) -> &'static str {
        match self {
            Constraint::String(_) => "string",
            Constraint::Number(n) if n.integer => "integer",
            Constraint::Number(_) => "number",
            Constraint::Boolean => "boolean",
            Constraint::Array(_) => "array",
            Constraint::Object(_) => "object",
            Constraint::OneOf(_) => "one of the declared shapes",
        }
    }
}

impl From<StringConstraint> for Constraint {
    fn from(c: StringConstraint) -> Self {
        Constraint::String(c)
    }
}

impl From<NumberConstraint> for Constraint {
    fn from(c: NumberConstraint) -> Self {
        Constraint::Number(c)
    }
}

impl From<ArrayConstraint> for Constraint {
    fn from(c: ArrayConstraint) -> Self {
        Constraint::Array(c)
    }
}

impl From<Schema> for Constraint {
    fn from(schema: Schema) -> Self {
        Constraint::object(schema)
    }
}

// =============================================================================
// String
// =============================================================================

/// Anchored regex plus the message reported when it does not match.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    /// Compile `source` so that it must match the entire value.
    pub fn new(source: &str, message: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", source))
            .map_err(|e| Error::config(format!("invalid pattern '{}': {}", source, e)))?;
        Ok(Self {
            regex,
            message: message.into(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringConstraint {
    pub(crate) min_len: Option<usize>,
    pub(crate) max_len: Option<usize>,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) allowed: Option<Vec<String>>,
}

impl StringConstraint {
    pub fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = Some(n);
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    pub fn pattern(mut self, source: &str, message: impl Into<String>) -> Result<Self> {
        self.pattern = Some(Pattern::new(source, message)?);
        Ok(self)
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Check a string. Length is counted in characters; bounds are inclusive.
    pub fn check(&self, value: &str) -> std::result::Result<(), String> {
        if let Some(allowed) = &self.allowed {
            if allowed.iter().any(|a| a == value) {
                return Ok(());
            }
            let expected: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
            return Err(format!(
                "Invalid enum value. Expected {}, received '{}'",
                expected.join(" | "),
                value
            ));
        }

        let len = value.chars().count();
        if let Some(min) = self.min_len {
            if len < min {
                return Err(format!("String must contain at least {} character(s)", min));
            }
        }
        if let Some(max) = self.max_len {
            if len > max {
                return Err(format!("String must contain at most {} character(s)", max));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Err(pattern.message.clone());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Number
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct NumberConstraint {
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) integer: bool,
}

impl NumberConstraint {
    pub fn min(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn max(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    /// Check a number. Bounds are inclusive; integer-only rejects any
    /// float representation, `1.0` included.
    pub fn check(&self, value: &Number) -> std::result::Result<(), String> {
        if self.integer && !(value.is_i64() || value.is_u64()) {
            return Err("Expected integer, received float".to_string());
        }
        let n = value.as_f64().unwrap_or(f64::NAN);
        if let Some(min) = self.minimum {
            if n.is_nan() || n < min {
                return Err(format!("Number must be greater than or equal to {}", min));
            }
        }
        if let Some(max) = self.maximum {
            if n.is_nan() || n > max {
                return Err(format!("Number must be less than or equal to {}", max));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Array
// =============================================================================

#[derive(Debug, Clone)]
pub struct ArrayConstraint {
    pub(crate) items: Box<Constraint>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) unique: bool,
}

impl ArrayConstraint {
    pub fn new(items: Constraint) -> Self {
        Self {
            items: Box::new(items),
            min_items: None,
            max_items: None,
            unique: false,
        }
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Cardinality and uniqueness. Element checks are the engine's job.
    pub fn check(&self, values: &[Value]) -> std::result::Result<(), String> {
        if let Some(min) = self.min_items {
            if values.len() < min {
                return Err(format!("Array must contain at least {} element(s)", min));
            }
        }
        if let Some(max) = self.max_items {
            if values.len() > max {
                return Err(format!("Array must contain at most {} element(s)", max));
            }
        }
        if self.unique {
            let mut seen = HashSet::with_capacity(values.len());
            for value in values {
                let key = value.to_string();
                if !seen.insert(key) {
                    return Err(format!("Array elements must be unique, {} is repeated", value));
                }
            }
        }
        Ok(())
    }
}

/// JSON type name as reported in "received ..." messages.
pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================
