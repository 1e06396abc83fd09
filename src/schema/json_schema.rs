//! JSON Schema rendering of a `Schema`, published as a tool's `inputSchema`.

use super::constraint::{ArrayConstraint, Constraint, NumberConstraint, StringConstraint};
use super::object::Schema;
use serde_json::{json, Map, Value};

impl Schema {
    /// Render as a draft-07 object schema.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields() {
            let mut property = field.constraint().to_json_schema();
            if let Value::Object(map) = &mut property {
                if let Some(description) = field.description() {
                    map.insert("description".to_string(), json!(description));
                }
                if let Some(default) = field.default_value() {
                    map.insert("default".to_string(), default.clone());
                }
            }
            if field.is_required() {
                required.push(json!(field.name()));
            }
            properties.insert(field.name().to_string(), property);
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if self.is_strict() {
            schema.insert("additionalProperties".to_string(), json!(false));
        }
        Value::Object(schema)
    }
}

impl Constraint {
    pub fn to_json_schema(&self) -> Value {
        match self {
            Constraint::String(c) => string_schema(c),
            Constraint::Number(c) => number_schema(c),
            Constraint::Boolean => json!({"type": "boolean"}),
            Constraint::Array(c) => array_schema(c),
            Constraint::Object(schema) => schema.to_json_schema(),
            Constraint::OneOf(alternatives) => json!({
                "anyOf": alternatives.iter().map(Constraint::to_json_schema).collect::<Vec<_>>(),
            }),
        }
    }
}

fn string_schema(c: &StringConstraint) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("string"));
    if let Some(allowed) = &c.allowed {
        map.insert("enum".to_string(), json!(allowed));
    }
    if let Some(min) = c.min_len {
        map.insert("minLength".to_string(), json!(min));
    }
    if let Some(max) = c.max_len {
        map.insert("maxLength".to_string(), json!(max));
    }
    if let Some(pattern) = &c.pattern {
        map.insert("pattern".to_string(), json!(pattern.as_str()));
    }
    Value::Object(map)
}

fn number_schema(c: &NumberConstraint) -> Value {
    let mut map = Map::new();
    let kind = if c.integer { "integer" } else { "number" };
    map.insert("type".to_string(), json!(kind));
    if let Some(min) = c.minimum {
        map.insert("minimum".to_string(), bound(min, c.integer));
    }
    if let Some(max) = c.maximum {
        map.insert("maximum".to_string(), bound(max, c.integer));
    }
    Value::Object(map)
}

// Integer bounds render as integers so `"minimum": 1` rather than `1.0`.
fn bound(n: f64, integer: bool) -> Value {
    if integer && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn array_schema(c: &ArrayConstraint) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("array"));
    map.insert("items".to_string(), c.items.to_json_schema());
    if let Some(min) = c.min_items {
        map.insert("minItems".to_string(), json!(min));
    }
    if let Some(max) = c.max_items {
        map.insert("maxItems".to_string(), json!(max));
    }
    if c.unique {
        map.insert("uniqueItems".to_string(), json!(true));
    }
    Value::Object(map)
}
