use crate::error_code::FailureClass;
use crate::pipeline::AttemptFailure;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "recipes[0].glass", "domains.cakes.models")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "input_reader", "openai_generator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the recipe service.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Malformed request: {message}{}", format_context(.context))]
    BadRequest {
        message: String,
        context: ErrorContext,
    },

    #[error("Output validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Generation error: {message}{}", format_context(.context))]
    Generation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote error: HTTP {status} ({class}): {message}")]
    Remote {
        status: u16,
        class: String,
        message: String,
    },

    #[error("All {} model(s) failed; last error: {}", .attempts.len(), last_attempt_message(.attempts))]
    FallbackExhausted { attempts: Vec<AttemptFailure> },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn last_attempt_message(attempts: &[AttemptFailure]) -> &str {
    attempts
        .last()
        .map(|a| a.message.as_str())
        .unwrap_or("no attempts were made")
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new malformed-request error with structured context
    pub fn bad_request_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::BadRequest {
            message: msg.into(),
            context,
        }
    }

    /// Create a new output validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new generation error with structured context
    pub fn generation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Generation {
            message: msg.into(),
            context,
        }
    }

    /// Shorthand for a generation error without context.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::generation_with_context(msg, ErrorContext::new())
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::BadRequest { context, .. }
            | Error::Validation { context, .. }
            | Error::Generation { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Message of the last attempt when every fallback candidate failed.
    pub fn last_message(&self) -> Option<&str> {
        match self {
            Error::FallbackExhausted { attempts } => attempts
                .last()
                .map(|a| a.message.as_str())
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Classify this error for attempt records and logs.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Error::Validation { .. } | Error::Generation { .. } | Error::Serialization(_) => {
                FailureClass::InvalidOutput
            }
            Error::Remote { status, class, .. } => FailureClass::from_provider_code(class)
                .unwrap_or_else(|| FailureClass::from_http_status(*status)),
            Error::Transport(TransportError::Http(e)) if e.is_timeout() => FailureClass::Timeout,
            Error::Transport(TransportError::Http(e)) if e.is_connect() => FailureClass::Network,
            Error::Transport(_) => FailureClass::Network,
            Error::BadRequest { .. } => FailureClass::InvalidRequest,
            Error::FallbackExhausted { attempts } => attempts
                .last()
                .map(|a| a.class)
                .unwrap_or(FailureClass::Unknown),
            Error::Configuration { .. } => FailureClass::Unknown,
        }
    }
}
