//! Provider 驱动层 — 将结构化生成请求映射为厂商 API 格式
//!
//! Provider driver layer: maps a schema-constrained generation request onto a
//! provider's wire format and extracts the model text from its response.

use serde_json::{json, Value};

use crate::error::Error;
use crate::generation::GenerationRequest;
use crate::structured::JsonModeConfig;

/// Provider-ready request body and target path.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRequest {
    /// Path appended to the transport base URL.
    pub path: String,
    /// Serialized JSON request body.
    pub body: Value,
}

/// Unified response extracted from the provider body.
#[derive(Debug, Clone, Default)]
pub struct DriverResponse {
    /// Assistant message text.
    pub content: Option<String>,
    /// Refusal text when the model declined to answer in-schema.
    pub refusal: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<UsageInfo>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Provider-specific request/response adaptation.
pub trait ProviderDriver: Send + Sync + std::fmt::Debug {
    /// Unique provider identifier, used in logs.
    fn provider_id(&self) -> &str;

    fn build_request(&self, model: &str, request: &GenerationRequest) -> Result<DriverRequest, Error>;

    fn parse_response(&self, body: &Value) -> Result<DriverResponse, Error>;
}

/// OpenAI chat-completions driver; also covers compatible gateways.
#[derive(Debug, Clone)]
pub struct OpenAiDriver {
    provider_id: String,
}

impl OpenAiDriver {
    pub const CHAT_PATH: &'static str = "/chat/completions";

    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
        }
    }
}

impl Default for OpenAiDriver {
    fn default() -> Self {
        Self::new("openai")
    }
}

impl ProviderDriver for OpenAiDriver {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn build_request(&self, model: &str, request: &GenerationRequest) -> Result<DriverRequest, Error> {
        let mut body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt },
            ],
            "temperature": request.sampling.temperature,
            "max_tokens": request.sampling.max_output_tokens,
            "stream": false,
        });

        let format = JsonModeConfig::from_schema(
            request.schema.schema.clone(),
            request.schema.name.clone(),
            false,
        )
        .to_openai_format();
        if let (Value::Object(target), Value::Object(extra)) = (&mut body, format) {
            target.extend(extra);
        }

        Ok(DriverRequest {
            path: Self::CHAT_PATH.to_string(),
            body,
        })
    }

    fn parse_response(&self, body: &Value) -> Result<DriverResponse, Error> {
        if body.pointer("/choices/0").is_none() {
            return Err(Error::generation(format!(
                "{} response has no choices",
                self.provider_id
            )));
        }

        let text_at = |pointer: &str| {
            body.pointer(pointer)
                .and_then(|v| v.as_str())
                .map(String::from)
        };

        let usage = body.get("usage").map(|u| UsageInfo {
            prompt_tokens: u["prompt_tokens"].as_u64().unwrap_or(0),
            completion_tokens: u["completion_tokens"].as_u64().unwrap_or(0),
            total_tokens: u["total_tokens"].as_u64().unwrap_or(0),
        });

        Ok(DriverResponse {
            content: text_at("/choices/0/message/content"),
            refusal: text_at("/choices/0/message/refusal"),
            finish_reason: text_at("/choices/0/finish_reason"),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{OutputSchema, SamplingParams};

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "system text".into(),
            prompt: "MOOD: calm".into(),
            schema: OutputSchema {
                name: "cocktail_recipe_set".into(),
                schema: json!({"type": "object"}),
            },
            sampling: SamplingParams {
                temperature: 0.6,
                max_output_tokens: 800,
            },
        }
    }

    #[test]
    fn test_openai_driver_build_request() {
        let driver = OpenAiDriver::default();
        let req = driver.build_request("gpt-4o-mini", &request()).unwrap();

        assert_eq!(req.path, "/chat/completions");
        assert_eq!(req.body["model"], "gpt-4o-mini");
        assert_eq!(req.body["temperature"], 0.6);
        assert_eq!(req.body["max_tokens"], 800);
        assert_eq!(req.body["messages"][0]["role"], "system");
        assert_eq!(req.body["messages"][0]["content"], "system text");
        assert_eq!(req.body["messages"][1]["content"], "MOOD: calm");
        assert_eq!(req.body["response_format"]["type"], "json_schema");
        assert_eq!(
            req.body["response_format"]["json_schema"]["name"],
            "cocktail_recipe_set"
        );
    }

    #[test]
    fn test_openai_driver_parse_response() {
        let driver = OpenAiDriver::default();
        let body = json!({
            "choices": [{"message": {"content": "{\"recipes\": []}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let resp = driver.parse_response(&body).unwrap();
        assert_eq!(resp.content.as_deref(), Some("{\"recipes\": []}"));
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert!(resp.refusal.is_none());
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_openai_driver_parse_refusal() {
        let driver = OpenAiDriver::default();
        let body = json!({
            "choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]
        });
        let resp = driver.parse_response(&body).unwrap();
        assert!(resp.content.is_none());
        assert_eq!(resp.refusal.as_deref(), Some("I can't help with that."));
    }

    #[test]
    fn test_openai_driver_no_choices() {
        let driver = OpenAiDriver::default();
        let err = driver.parse_response(&json!({"choices": []})).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
