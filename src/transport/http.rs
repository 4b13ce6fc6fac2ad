use crate::error_code::FailureClass;
use crate::{Error, Result};
use reqwest::Proxy;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Settings for the outbound HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub proxy_url: Option<String>,
}

/// JSON-over-HTTP client for the upstream model provider.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(settings.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &settings.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(TransportError::Http)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(TransportError::Http)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the decoded JSON response.
    ///
    /// Non-2xx statuses become [`Error::Remote`] with the provider's own error
    /// message and type when the body carries an OpenAI-style error object.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        bearer_token: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);

        if let Some(key) = bearer_token {
            request = request.bearer_auth(key);
        }
        if let Some(id) = request_id {
            request = request.header("x-request-id", id);
        }

        let response = request.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "provider responded");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(remote_error(status.as_u16(), &text));
        }

        let json = response.json().await.map_err(TransportError::Http)?;
        Ok(json)
    }
}

/// Build a classified remote error from a non-success status and body.
pub(crate) fn remote_error(status: u16, body: &str) -> Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error_obj = parsed.as_ref().and_then(|v| v.get("error"));

    let message = error_obj
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.chars().take(500).collect()
            }
        });

    let class = error_obj
        .and_then(|e| {
            e.get("code")
                .and_then(|c| c.as_str())
                .or_else(|| e.get("type").and_then(|t| t.as_str()))
        })
        .filter(|c| FailureClass::from_provider_code(c).is_some())
        .map(String::from)
        .unwrap_or_else(|| FailureClass::from_http_status(status).name().to_string());

    Error::Remote {
        status,
        class,
        message,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
