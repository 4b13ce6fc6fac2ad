//! Schema-constrained generation against an OpenAI-compatible endpoint.

use super::{BindGenerator, GenerationProvider, GenerationRequest, RequestContext, StructuredGenerator};
use crate::config::ServerConfig;
use crate::drivers::{OpenAiDriver, ProviderDriver};
use crate::structured::{OutputValidator, StructuredOutput};
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Generator that asks the provider for `json_schema` output and checks the
/// answer locally: defaults are filled and the schema is enforced before a
/// value is returned.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    driver: OpenAiDriver,
    transport: Arc<HttpTransport>,
    api_key: Option<String>,
    request_id: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(transport: Arc<HttpTransport>, api_key: Option<String>) -> Self {
        Self {
            driver: OpenAiDriver::default(),
            transport,
            api_key,
            request_id: None,
        }
    }

    /// Tag outbound calls with the inbound request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

#[async_trait]
impl StructuredGenerator for OpenAiGenerator {
    async fn generate(&self, model_id: &str, request: &GenerationRequest) -> Result<Value> {
        let driver_request = self.driver.build_request(model_id, request)?;
        let body = self
            .transport
            .post_json(
                &driver_request.path,
                &driver_request.body,
                self.api_key.as_deref(),
                self.request_id.as_deref(),
            )
            .await?;

        let response = self.driver.parse_response(&body)?;
        if let Some(usage) = response.usage {
            debug!(
                model = model_id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "generation usage"
            );
        }

        let context = || {
            ErrorContext::new()
                .with_source("openai_generator")
                .with_details(format!("model: {}", model_id))
        };

        if let Some(refusal) = response.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(Error::generation_with_context(
                format!("model refused: {}", refusal),
                context(),
            ));
        }

        let content = match response.content.filter(|c| !c.trim().is_empty()) {
            Some(content) => content,
            None => {
                let reason = response.finish_reason.as_deref().unwrap_or("unknown");
                return Err(Error::generation_with_context(
                    format!("model returned no content (finish_reason: {})", reason),
                    context(),
                ));
            }
        };

        let validator = OutputValidator::strict(request.schema.schema.clone());
        StructuredOutput::from_response(content, &validator)
            .into_result()
            .map_err(|errors| {
                let mut ctx = context();
                if let Some(path) = errors.first().and_then(|e| e.path.clone()) {
                    ctx = ctx.with_field_path(path);
                }
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                Error::validation_with_context(messages.join("; "), ctx)
            })
    }
}

/// Request-bound factory for [`OpenAiGenerator`].
///
/// With `forward_authorization` set, a caller's bearer token is used for the
/// upstream call; otherwise, or when the caller sent none, the configured key
/// is used.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    transport: Arc<HttpTransport>,
    api_key: Option<String>,
    forward_authorization: bool,
}

impl OpenAiProvider {
    pub fn new(transport: Arc<HttpTransport>, api_key: Option<String>, forward_authorization: bool) -> Self {
        Self {
            transport,
            api_key,
            forward_authorization,
        }
    }

    /// Build the provider described by the server configuration.
    pub fn from_config(config: &ServerConfig) -> Result<GenerationProvider> {
        let transport = Arc::new(HttpTransport::new(&config.transport_settings())?);
        let provider = Self::new(transport, config.api_key.clone(), config.forward_authorization);
        Ok(GenerationProvider::RequestBound(Arc::new(provider)))
    }
}

impl BindGenerator for OpenAiProvider {
    fn bind(&self, ctx: &RequestContext) -> Result<Arc<dyn StructuredGenerator>> {
        let forwarded = if self.forward_authorization {
            ctx.bearer_token().map(String::from)
        } else {
            None
        };
        let api_key = forwarded.or_else(|| self.api_key.clone());
        if api_key.is_none() {
            return Err(Error::configuration_with_context(
                "no API key configured and none forwarded by the caller",
                ErrorContext::new()
                    .with_source("openai_provider")
                    .with_field_path("api_key"),
            ));
        }

        let generator = OpenAiGenerator::new(Arc::clone(&self.transport), api_key)
            .with_request_id(ctx.request_id.clone());
        Ok(Arc::new(generator))
    }
}
