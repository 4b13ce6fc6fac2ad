//! JSON mode support for structured output.
//!
//! Provides the `response_format` block sent to OpenAI-compatible providers
//! and the parsing of the raw text they return.

use crate::structured::error::{ValidationError, ValidationResult};
use crate::structured::validator::OutputValidator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Fallbacks for text that is not bare JSON, tried in order: a ```json
/// fence, a bare fence, then the outermost braces.
static EMBEDDED_JSON: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"```json\s*([\s\S]*?)\s*```",
        r"```\s*([\s\S]*?)\s*```",
        r"\{[\s\S]*\}",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// The `json_schema` response format for OpenAI-compatible providers.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonModeConfig {
    /// Schema the provider constrains decoding to.
    pub schema: Value,

    /// Name for the schema (used in OpenAI format)
    pub schema_name: String,

    /// Whether the provider should enforce strict schema compliance.
    ///
    /// OpenAI strict mode rejects schemas that declare defaults or optional
    /// properties, so recipe schemas are sent non-strict and checked locally.
    pub strict: bool,
}

impl JsonModeConfig {
    /// Create a config from a JSON schema.
    ///
    /// ```
    /// use ai_recipes::structured::JsonModeConfig;
    /// use serde_json::json;
    ///
    /// let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
    /// let config = JsonModeConfig::from_schema(schema, "recipe_set", false);
    /// assert_eq!(config.schema_name, "recipe_set");
    /// ```
    pub fn from_schema(schema: Value, name: impl Into<String>, strict: bool) -> Self {
        Self {
            schema,
            schema_name: name.into(),
            strict,
        }
    }

    /// Convert to the OpenAI `response_format` request field.
    pub fn to_openai_format(&self) -> Value {
        serde_json::json!({
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": self.schema_name,
                    "strict": self.strict,
                    "schema": self.schema
                }
            }
        })
    }
}

/// Structured output result with validation.
///
/// Wraps the raw text returned by the model together with the parsed and
/// validated value.
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    /// Raw response content as string
    pub raw: String,

    /// Parsed JSON data (None if parsing failed)
    pub parsed: Option<Value>,

    /// Validation result
    pub validation_result: ValidationResult,
}

impl StructuredOutput {
    /// Parse and validate raw model output.
    ///
    /// ```
    /// use ai_recipes::structured::{OutputValidator, StructuredOutput};
    /// use serde_json::json;
    ///
    /// let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
    /// let validator = OutputValidator::strict(schema);
    ///
    /// let output = StructuredOutput::from_response(r#"{"name": "Alice"}"#, &validator);
    /// assert!(output.is_valid());
    /// ```
    pub fn from_response(content: impl Into<String>, validator: &OutputValidator) -> Self {
        let raw = content.into();
        let parsed = Self::parse_json(raw.trim());

        let validation_result = match &parsed {
            Some(value) => validator.validate(value),
            None => ValidationResult::from_error(ValidationError::without_path(
                "Model output is not valid JSON",
            )),
        };

        Self {
            raw,
            parsed,
            validation_result,
        }
    }

    /// Parse JSON from text, with support for markdown code blocks.
    ///
    /// Accepts a raw JSON document, or one wrapped in a ```json or bare ``` fence.
    fn parse_json(text: &str) -> Option<Value> {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            return Some(parsed);
        }

        for re in EMBEDDED_JSON.iter() {
            if let Some(captures) = re.captures(text) {
                let candidate = match captures.get(1) {
                    Some(inner) => inner.as_str(),
                    None => captures.get(0).map(|c| c.as_str()).unwrap_or(text),
                };

                if let Ok(parsed) = serde_json::from_str::<Value>(candidate.trim()) {
                    return Some(parsed);
                }
            }
        }

        None
    }

    /// Check if the output parsed and validated.
    pub fn is_valid(&self) -> bool {
        self.validation_result.is_valid()
    }

    /// Get the parsed JSON data (if parsing succeeded).
    pub fn parsed(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    /// Get validation errors if validation failed.
    pub fn errors(&self) -> &[ValidationError] {
        &self.validation_result.errors
    }

    /// Get error messages as strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.validation_result.error_messages()
    }

    /// Consume the output, yielding the validated value (defaults applied).
    pub fn into_result(self) -> Result<Value, Vec<ValidationError>> {
        self.validation_result.into_result()
    }
}
