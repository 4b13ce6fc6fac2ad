//! Fallback Operator
//!
//! Ordered failover across model identifiers. Attempts run strictly one after
//! another; the first success wins and every earlier failure is recorded.

use crate::error_code::FailureClass;
use crate::generation::{GenerationRequest, StructuredGenerator};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// One failed generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub model: String,
    pub class: FailureClass,
    pub message: String,
}

impl AttemptFailure {
    pub fn from_error(model: impl Into<String>, err: &Error) -> Self {
        Self {
            model: model.into(),
            class: err.failure_class(),
            message: err.to_string(),
        }
    }
}

/// Result of a successful run: the decoded value, the identifier that
/// produced it, and the failures recorded before it.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSuccess<T> {
    pub value: T,
    pub model: String,
    pub failures: Vec<AttemptFailure>,
}

/// Position of the controller in its candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    Trying(usize),
    Done(usize),
    Failed,
}

impl FallbackState {
    pub fn on_success(self) -> Self {
        match self {
            FallbackState::Trying(i) => FallbackState::Done(i),
            terminal => terminal,
        }
    }

    pub fn on_failure(self, len: usize) -> Self {
        match self {
            FallbackState::Trying(i) if i + 1 < len => FallbackState::Trying(i + 1),
            FallbackState::Trying(_) => FallbackState::Failed,
            terminal => terminal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackController {
    candidates: Vec<String>,
}

impl FallbackController {
    /// Smallest candidate list accepted.
    pub const MIN_CANDIDATES: usize = 2;

    pub fn new(candidates: Vec<String>) -> Result<Self> {
        if candidates.len() < Self::MIN_CANDIDATES {
            return Err(Error::configuration_with_context(
                format!(
                    "fallback needs at least {} model identifiers, got {}",
                    Self::MIN_CANDIDATES,
                    candidates.len()
                ),
                ErrorContext::new()
                    .with_field_path("models")
                    .with_source("fallback_controller"),
            ));
        }
        if let Some(blank) = candidates.iter().position(|c| c.trim().is_empty()) {
            return Err(Error::configuration_with_context(
                "model identifier must not be empty",
                ErrorContext::new()
                    .with_field_path(format!("models[{}]", blank))
                    .with_source("fallback_controller"),
            ));
        }
        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Try each candidate in order until one generates a value that `decode`
    /// accepts.
    pub async fn run<T, F>(
        &self,
        generator: &dyn StructuredGenerator,
        request: &GenerationRequest,
        decode: F,
    ) -> Result<FallbackSuccess<T>>
    where
        F: Fn(Value) -> Result<T>,
    {
        let len = self.candidates.len();
        let mut failures = Vec::new();
        let mut state = FallbackState::Trying(0);
        let mut decoded = None;

        while let FallbackState::Trying(i) = state {
            let model = &self.candidates[i];
            debug!(model = %model, attempt = i + 1, of = len, "generation attempt");

            let outcome = match generator.generate(model, request).await {
                Ok(value) => decode(value),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => {
                    decoded = Some(value);
                    state = state.on_success();
                }
                Err(e) => {
                    let failure = AttemptFailure::from_error(model.as_str(), &e);
                    warn!(
                        model = %failure.model,
                        code = failure.class.code(),
                        class = failure.class.name(),
                        error = %failure.message,
                        "generation attempt failed"
                    );
                    failures.push(failure);
                    state = state.on_failure(len);
                }
            }
        }

        match (state, decoded) {
            (FallbackState::Done(i), Some(value)) => Ok(FallbackSuccess {
                value,
                model: self.candidates[i].clone(),
                failures,
            }),
            _ => Err(Error::FallbackExhausted { attempts: failures }),
        }
    }
}
