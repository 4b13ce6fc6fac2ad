//! Output validator for structured responses.
//!
//! Validates JSON data against JSON schemas, supporting:
//! - Basic type validation (string, integer, number, boolean, array, object, null)
//! - Field constraints (minLength, maxLength, minimum, maximum, enum)
//! - Array constraints (minItems, maxItems, items schema)
//! - Nested validation (recursive object and array validation)
//! - Additional properties control
//!
//! Before checking, the validator normalizes the data: properties that are
//! missing but declare a `default` are filled in, and integral floats are
//! coerced where the schema asks for an integer.

use crate::structured::error::{ValidationError, ValidationResult};
use serde_json::Value;
use std::collections::HashSet;

/// Validator for structured output.
///
/// Validates JSON data against JSON schemas with full error reporting.
#[derive(Debug, Clone)]
pub struct OutputValidator {
    /// The JSON schema to validate against
    schema: Value,
    /// Whether objects without an explicit `additionalProperties` are closed
    strict: bool,
}

impl OutputValidator {
    /// Create a new validator with a schema.
    ///
    /// # Arguments
    ///
    /// * `schema` - JSON schema as a serde_json::Value
    /// * `strict` - Whether to disallow extra properties by default
    pub fn new(schema: Value, strict: bool) -> Self {
        Self { schema, strict }
    }

    /// Create a new validator with a schema (strict mode enabled).
    pub fn strict(schema: Value) -> Self {
        Self::new(schema, true)
    }

    /// The schema this validator checks against.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Normalize and validate data against the schema.
    ///
    /// On success the result carries the normalized value (defaults applied).
    pub fn validate(&self, data: &Value) -> ValidationResult {
        let mut normalized = data.clone();
        normalize(&mut normalized, &self.schema);

        let mut errors = Vec::new();
        self.validate_against_schema(&normalized, &self.schema, "", &mut errors);

        if errors.is_empty() {
            ValidationResult::success(normalized)
        } else {
            ValidationResult::failure(errors)
        }
    }

    /// Validate data and return the normalized value or the errors.
    pub fn validate_or_fail(&self, data: &Value) -> Result<Value, Vec<ValidationError>> {
        self.validate(data).into_result()
    }

    fn validate_against_schema(
        &self,
        data: &Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let schema_type = schema.get("type").and_then(|t| t.as_str());
        if let Some(type_name) = schema_type {
            if let Err(e) = validate_type(data, type_name, path) {
                errors.push(e);
                return;
            }
        }

        match data {
            Value::String(s) => validate_string(s, schema, path, errors),
            Value::Number(n) => {
                if let Some(num) = n.as_f64() {
                    validate_number(num, schema, path, errors);
                }
            }
            Value::Array(items) => self.validate_array(items, schema, path, errors),
            Value::Object(_) => self.validate_object(data, schema, path, errors),
            _ => {}
        }

        if let Some(enum_values) = schema.get("enum").and_then(|e| e.as_array()) {
            validate_enum(data, enum_values, path, errors);
        }
    }

    fn validate_array(
        &self,
        arr: &[Value],
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(min_items) = schema.get("minItems").and_then(|m| m.as_u64()) {
            if (arr.len() as u64) < min_items {
                errors.push(ValidationError::with_path(
                    format!("Array too short (minimum {} items)", min_items),
                    path,
                ));
            }
        }

        if let Some(max_items) = schema.get("maxItems").and_then(|m| m.as_u64()) {
            if (arr.len() as u64) > max_items {
                errors.push(ValidationError::with_path(
                    format!("Array too long (maximum {} items)", max_items),
                    path,
                ));
            }
        }

        if let Some(items_schema) = schema.get("items") {
            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                self.validate_against_schema(item, items_schema, &item_path, errors);
            }
        }
    }

    fn validate_object(
        &self,
        data: &Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let obj = match data.as_object() {
            Some(o) => o,
            None => return,
        };

        let required = schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>())
            .unwrap_or_default();

        for prop_name in required {
            if !obj.contains_key(prop_name) {
                errors.push(ValidationError::with_path(
                    format!("Missing required property: {}", prop_name),
                    join_path(path, prop_name),
                ));
            }
        }

        let properties = schema.get("properties").and_then(|p| p.as_object());

        if let Some(properties) = properties {
            for (prop_name, prop_schema) in properties {
                if let Some(prop_value) = obj.get(prop_name) {
                    let prop_path = join_path(path, prop_name);
                    self.validate_against_schema(prop_value, prop_schema, &prop_path, errors);
                }
            }
        }

        let additional_allowed = schema
            .get("additionalProperties")
            .and_then(|a| a.as_bool())
            .unwrap_or(!self.strict);

        if !additional_allowed {
            let allowed_keys: HashSet<&str> = properties
                .map(|p| p.keys().map(|k| k.as_str()).collect())
                .unwrap_or_default();
            for key in obj.keys() {
                if !allowed_keys.contains(key.as_str()) {
                    errors.push(ValidationError::with_path(
                        format!("Additional property not allowed: {}", key),
                        join_path(path, key),
                    ));
                }
            }
        }
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Fill schema defaults for missing properties and coerce integral floats.
fn normalize(data: &mut Value, schema: &Value) {
    let schema_type = schema.get("type").and_then(|t| t.as_str());

    match data {
        Value::Object(obj) => {
            let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) else {
                return;
            };
            for (prop_name, prop_schema) in properties {
                match obj.get_mut(prop_name) {
                    Some(value) => normalize(value, prop_schema),
                    None => {
                        if let Some(default) = prop_schema.get("default") {
                            obj.insert(prop_name.clone(), default.clone());
                        }
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(items_schema) = schema.get("items") {
                for item in items.iter_mut() {
                    normalize(item, items_schema);
                }
            }
        }
        Value::Number(n) if schema_type == Some("integer") && !n.is_i64() && !n.is_u64() => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    *data = Value::Number((f as i64).into());
                }
            }
        }
        _ => {}
    }
}

fn validate_type(data: &Value, expected_type: &str, path: &str) -> Result<(), ValidationError> {
    let is_valid = match expected_type {
        "string" => data.is_string(),
        "integer" => data.is_i64() || data.is_u64(),
        "number" => data.is_number(),
        "boolean" => data.is_boolean(),
        "array" => data.is_array(),
        "object" => data.is_object(),
        "null" => data.is_null(),
        _ => true,
    };

    if is_valid {
        return Ok(());
    }

    let actual_type = match data {
        Value::String(_) => "string",
        Value::Number(_) if data.is_i64() || data.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    };
    Err(ValidationError::with_path(
        format!("Expected type '{}', got '{}'", expected_type, actual_type),
        path,
    ))
}

fn validate_string(s: &str, schema: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let len = s.chars().count() as u64;

    if let Some(min_length) = schema.get("minLength").and_then(|m| m.as_u64()) {
        if len < min_length {
            errors.push(ValidationError::with_path(
                format!("String too short (minimum {} characters)", min_length),
                path,
            ));
        }
    }

    if let Some(max_length) = schema.get("maxLength").and_then(|m| m.as_u64()) {
        if len > max_length {
            errors.push(ValidationError::with_path(
                format!("String too long (maximum {} characters)", max_length),
                path,
            ));
        }
    }
}

fn validate_number(value: f64, schema: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    if let Some(minimum) = schema.get("minimum").and_then(|m| m.as_f64()) {
        if value < minimum {
            errors.push(ValidationError::with_path(
                format!("Value below minimum ({})", minimum),
                path,
            ));
        }
    }

    if let Some(maximum) = schema.get("maximum").and_then(|m| m.as_f64()) {
        if value > maximum {
            errors.push(ValidationError::with_path(
                format!("Value above maximum ({})", maximum),
                path,
            ));
        }
    }
}

fn validate_enum(data: &Value, enum_values: &[Value], path: &str, errors: &mut Vec<ValidationError>) {
    if enum_values.contains(data) {
        return;
    }
    let allowed: Vec<String> = enum_values
        .iter()
        .map(|v| match v {
            Value::String(s) => format!("\"{}\"", s),
            _ => v.to_string(),
        })
        .collect();
    errors.push(ValidationError::with_path(
        format!("Value not in allowed enum values: {}", allowed.join(", ")),
        path,
    ));
}
