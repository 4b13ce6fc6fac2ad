//! Schema generation utilities.

use crate::{Error, ErrorContext, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

/// Generator for JSON object schemas with customization options.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    title: Option<String>,
    properties: Vec<(String, Value)>,
    required: Vec<String>,
    additional_properties: bool,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Add a property and mark it as required.
    pub fn add_required(mut self, name: impl Into<String>, schema: Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, schema));
        self
    }

    pub fn set_additional_properties(mut self, additional: bool) -> Self {
        self.additional_properties = additional;
        self
    }

    pub fn build(self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!("object"));

        let mut properties = serde_json::Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        map.insert("properties".into(), properties.into());

        if !self.required.is_empty() {
            map.insert("required".into(), self.required.into());
        }

        if !self.additional_properties {
            map.insert("additionalProperties".into(), json!(false));
        }

        if let Some(title) = self.title {
            map.insert("title".into(), title.into());
        }

        map.into()
    }
}

pub fn string() -> Value {
    json!({"type": "string"})
}

pub fn string_with_default(default: &str) -> Value {
    json!({"type": "string", "default": default})
}

/// Closed set of string values with a default member.
pub fn string_enum(values: &[&str], default: &str) -> Value {
    json!({"type": "string", "enum": values, "default": default})
}

pub fn boolean() -> Value {
    json!({"type": "boolean"})
}

pub fn bounded_integer(minimum: i64, maximum: i64, default: i64) -> Value {
    json!({
        "type": "integer",
        "minimum": minimum,
        "maximum": maximum,
        "default": default
    })
}

/// Array of `items` that defaults to empty.
pub fn array_with_default(items: Value) -> Value {
    json!({"type": "array", "items": items, "default": []})
}

/// Array of `items` bounded to `[min, max]` entries.
pub fn bounded_array(items: Value, min: u64, max: u64) -> Value {
    json!({"type": "array", "items": items, "minItems": min, "maxItems": max})
}

/// Compile `schema` as draft 7 and check that `example` conforms to it.
///
/// Run once at startup so a broken schema or a stale worked example in a
/// prompt never reaches the model.
pub fn preflight(name: &str, schema: &Value, example: &Value) -> Result<()> {
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|e| {
            Error::configuration_with_context(
                format!("schema does not compile: {}", e),
                ErrorContext::new().with_source("schema_preflight").with_field_path(name),
            )
        })?;

    if let Err(errors) = compiled.validate(example) {
        let error_msgs: Vec<String> = errors.map(|e| e.to_string()).collect();
        return Err(Error::configuration_with_context(
            format!("worked example does not match schema: {}", error_msgs.join("; ")),
            ErrorContext::new().with_source("schema_preflight").with_field_path(name),
        ));
    }
    Ok(())
}
