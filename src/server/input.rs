//! Input reader: raw request body to [`RecipeRequest`].
//!
//! Deliberately permissive. Only an unparseable body is an error; missing or
//! oddly typed fields pass through for the model to cope with.

use crate::types::RecipeRequest;
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Value};

pub fn read_request(body: &[u8]) -> Result<RecipeRequest> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        Error::bad_request_with_context(
            format!("body is not valid JSON: {}", e),
            ErrorContext::new().with_source("input_reader"),
        )
    })?;

    match value {
        Value::Null => Err(Error::bad_request_with_context(
            "body is null",
            ErrorContext::new().with_source("input_reader"),
        )),
        Value::Object(fields) => Ok(RecipeRequest {
            mood: text_field(&fields, "mood"),
            occasion: text_field(&fields, "occasion"),
            style: text_field(&fields, "style"),
            base: text_field(&fields, "base"),
            ingredients_csv: text_field(&fields, "ingredientsCSV"),
        }),
        _ => Ok(RecipeRequest::default()),
    }
}

fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
