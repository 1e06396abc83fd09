//! Schema composer: object schemas built from field specs.
//!
//! A `Schema` is an immutable value: built once per tool at startup, then
//! shared by every call. Builder methods consume and return `Self`.

use super::constraint::Constraint;
use super::validate::{self, child_path, ValidationErrors, Violation};
use serde_json::{Map, Value};

// =============================================================================
// Field spec
// =============================================================================

/// One declared field of an object schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) constraint: Constraint,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) description: Option<String>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, constraint: impl Into<Constraint>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
            required: true,
            default: None,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, constraint: impl Into<Constraint>) -> Self {
        Self {
            required: false,
            ..Self::required(name, constraint)
        }
    }

    /// Value injected into the normalized output when the field is absent.
    /// A defaulted field is never reported as missing.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

// =============================================================================
// Refinements
// =============================================================================

/// Cross-field rule, evaluated on the normalized object once every field
/// check has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refinement {
    /// No value of `field` (scalar or array elements) may equal a value of
    /// `other`.
    DistinctFrom { field: String, other: String },
    /// When both are present, `low` must not exceed `high`.
    OrderedRange { low: String, high: String },
}

impl Refinement {
    pub fn distinct_from(field: impl Into<String>, other: impl Into<String>) -> Self {
        Refinement::DistinctFrom {
            field: field.into(),
            other: other.into(),
        }
    }

    pub fn ordered_range(low: impl Into<String>, high: impl Into<String>) -> Self {
        Refinement::OrderedRange {
            low: low.into(),
            high: high.into(),
        }
    }

    pub(crate) fn check(&self, object: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
        match self {
            Refinement::DistinctFrom { field, other } => {
                let (Some(value), Some(reference)) = (object.get(field), object.get(other)) else {
                    return;
                };
                let reference = as_slice(reference);
                match value {
                    Value::Array(items) => {
                        for (i, item) in items.iter().enumerate() {
                            if reference.contains(item) {
                                out.push(Violation::new(
                                    child_path(&child_path(path, field), &i.to_string()),
                                    format!("Must not repeat {} from '{}'", item, other),
                                ));
                            }
                        }
                    }
                    scalar => {
                        if reference.contains(scalar) {
                            out.push(Violation::new(
                                child_path(path, field),
                                format!("Must not repeat {} from '{}'", scalar, other),
                            ));
                        }
                    }
                }
            }
            Refinement::OrderedRange { low, high } => {
                let lo = object.get(low).and_then(Value::as_f64);
                let hi = object.get(high).and_then(Value::as_f64);
                if let (Some(lo), Some(hi)) = (lo, hi) {
                    if lo > hi {
                        out.push(Violation::new(
                            child_path(path, low),
                            format!("Must be less than or equal to '{}'", high),
                        ));
                    }
                }
            }
        }
    }
}

fn as_slice(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Ordered field specs plus unknown-key policy and cross-field rules.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) strict: bool,
    pub(crate) refinements: Vec<Refinement>,
}

impl Schema {
    /// Undeclared input keys are violations.
    pub fn strict() -> Self {
        Self {
            fields: Vec::new(),
            strict: true,
            refinements: Vec::new(),
        }
    }

    /// Undeclared input keys are dropped from the output.
    pub fn open() -> Self {
        Self {
            strict: false,
            ..Self::strict()
        }
    }

    /// Declare a field. Redeclaring a name replaces the earlier spec in place.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == spec.name) {
            *existing = spec;
        } else {
            self.fields.push(spec);
        }
        self
    }

    pub fn fields_from<I: IntoIterator<Item = FieldSpec>>(self, specs: I) -> Self {
        specs.into_iter().fold(self, Schema::field)
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.field_spec(key).is_some()
    }

    /// Fails when a declared default does not satisfy its own constraint.
    pub fn verify_defaults(&self) -> Result<(), ValidationErrors> {
        validate::verify_defaults(self)
    }

    /// Run the validation engine against `input`.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        validate::validate(self, input)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_makes_field_optional() {
        let spec = FieldSpec::required("page", Constraint::integer()).with_default(json!(1));
        assert!(!spec.is_required());
        assert_eq!(spec.default_value(), Some(&json!(1)));
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let schema = Schema::strict()
            .field(FieldSpec::required("a", Constraint::string()))
            .field(FieldSpec::required("b", Constraint::string()))
            .field(FieldSpec::optional("a", Constraint::boolean()));

        let names: Vec<&str> = schema.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!schema.field_spec("a").unwrap().is_required());
    }

    #[test]
    fn test_open_and_strict_modes() {
        assert!(Schema::strict().is_strict());
        assert!(!Schema::open().is_strict());
    }

    #[test]
    fn test_distinct_from_reports_each_repeated_element() {
        let object = json!({"query": "a.com", "intersect": ["b.com", "a.com"]});
        let mut out = Vec::new();
        Refinement::distinct_from("intersect", "query").check(
            object.as_object().unwrap(),
            "",
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, "intersect.1");
    }

    #[test]
    fn test_distinct_from_scalar_against_array() {
        let object = json!({"minusDomain": "a.com", "domains": ["a.com", "b.com"]});
        let mut out = Vec::new();
        Refinement::distinct_from("minusDomain", "domains").check(
            object.as_object().unwrap(),
            "",
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, "minusDomain");
    }

    #[test]
    fn test_ordered_range_uses_nested_path() {
        let object = json!({"cost_from": 5, "cost_to": 1});
        let mut out = Vec::new();
        Refinement::ordered_range("cost_from", "cost_to").check(
            object.as_object().unwrap(),
            "filters",
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, "filters.cost_from");
    }

    #[test]
    fn test_ordered_range_ignores_partial_bounds() {
        let object = json!({"cost_from": 5});
        let mut out = Vec::new();
        Refinement::ordered_range("cost_from", "cost_to").check(
            object.as_object().unwrap(),
            "",
            &mut out,
        );
        assert!(out.is_empty());
    }
}
