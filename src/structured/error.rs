//! Error types for structured output validation.

use std::fmt;

/// Validation error with location information.
///
/// Contains details about what failed and where in the data structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message describing what went wrong
    pub message: String,
    /// JSON path to the error location (e.g., "recipes[0].glass")
    pub path: Option<String>,
}

impl ValidationError {
    /// Create an error with a path.
    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an error without path.
    pub fn without_path(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of validation operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// List of validation errors (empty if valid)
    pub errors: Vec<ValidationError>,
    /// Validated data with schema defaults applied (None if invalid)
    pub data: Option<serde_json::Value>,
}

impl ValidationResult {
    /// Create a successful validation result.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            data: Some(data),
        }
    }

    /// Create a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: false,
            errors,
            data: None,
        }
    }

    /// Create a failure from a single error.
    pub fn from_error(error: ValidationError) -> Self {
        Self::failure(vec![error])
    }

    /// Check if validation passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get the validated data.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Get errors as formatted strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Convert to Result.
    pub fn into_result(self) -> Result<serde_json::Value, Vec<ValidationError>> {
        if self.valid {
            Ok(self.data.unwrap_or(serde_json::Value::Null))
        } else {
            Err(self.errors)
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}
