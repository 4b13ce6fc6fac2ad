//! Structured output module.
//!
//! Schema building, default filling, and validation of model output:
//! - `SchemaGenerator`: build closed object schemas for recipe types
//! - `OutputValidator`: fill schema defaults, then validate JSON against the schema
//! - `StructuredOutput`: parse raw model text (optionally fenced) and validate it
//! - `JsonModeConfig`: the `response_format` block sent to the provider
//!
//! # Examples
//!
//! ```
//! use ai_recipes::structured::OutputValidator;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string"},
//!         "garnish": {"type": "string", "default": ""}
//!     },
//!     "required": ["name"]
//! });
//!
//! let validator = OutputValidator::strict(schema);
//! let result = validator.validate(&json!({"name": "Citrus Breeze"}));
//!
//! assert!(result.is_valid());
//! assert_eq!(result.data().unwrap()["garnish"], "");
//! ```

pub mod error;
pub mod json_mode;
pub mod schema;
pub mod validator;

pub use error::{ValidationError, ValidationResult};
pub use json_mode::{JsonModeConfig, StructuredOutput};
pub use schema::{preflight, SchemaGenerator};
pub use validator::OutputValidator;
