//! Schema-constrained generation capability.
//!
//! The core only selects a schema and passes it through; the capability is
//! responsible for producing a value that conforms to it (or failing), and its
//! answer is treated as authoritative.
//!
//! Providers that need per-request credentials are modeled explicitly with
//! [`GenerationProvider::RequestBound`]: binding is a separate phase that
//! yields a generator scoped to one inbound request. Providers that do not
//! need it are [`GenerationProvider::Unbound`] and pass through unchanged.

pub mod openai;

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub use openai::{OpenAiGenerator, OpenAiProvider};

/// Sampling parameters fixed per domain variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

/// Named JSON schema the output must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

/// Everything a single generation attempt needs except the model identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub schema: OutputSchema,
    pub sampling: SamplingParams,
}

/// Produces an object satisfying `request.schema`, or fails.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(&self, model_id: &str, request: &GenerationRequest) -> Result<Value>;
}

/// Facts about the inbound request a provider may bind to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    /// Raw `Authorization` header of the inbound request, if any.
    pub authorization: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            authorization: None,
        }
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Token from a `Bearer <token>` authorization header.
    pub fn bearer_token(&self) -> Option<&str> {
        let header = self.authorization.as_deref()?.trim();
        let (scheme, token) = header.split_once(' ')?;
        let token = token.trim();
        if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
            Some(token)
        } else {
            None
        }
    }
}

/// Initialization phase for providers that must be bound to a request.
pub trait BindGenerator: Send + Sync {
    fn bind(&self, ctx: &RequestContext) -> Result<Arc<dyn StructuredGenerator>>;
}

/// A generation capability, with or without a request-binding phase.
#[derive(Clone)]
pub enum GenerationProvider {
    Unbound(Arc<dyn StructuredGenerator>),
    RequestBound(Arc<dyn BindGenerator>),
}

impl GenerationProvider {
    /// Resolve the generator to use for one inbound request.
    pub fn for_request(&self, ctx: &RequestContext) -> Result<Arc<dyn StructuredGenerator>> {
        match self {
            GenerationProvider::Unbound(generator) => Ok(Arc::clone(generator)),
            GenerationProvider::RequestBound(binder) => binder.bind(ctx),
        }
    }

    pub fn requires_binding(&self) -> bool {
        matches!(self, GenerationProvider::RequestBound(_))
    }
}

impl std::fmt::Debug for GenerationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationProvider::Unbound(_) => f.write_str("GenerationProvider::Unbound"),
            GenerationProvider::RequestBound(_) => f.write_str("GenerationProvider::RequestBound"),
        }
    }
}
