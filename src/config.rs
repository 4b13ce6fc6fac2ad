//! 服务配置：YAML 文件 + 环境变量覆盖
//!
//! Server configuration. Values come from built-in defaults, then an optional
//! YAML file named by `RECIPES_CONFIG`, then environment variables.

use crate::domains::{cake, cocktail};
use crate::server::HEALTH_ROUTE;
use crate::transport::TransportSettings;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "RECIPES_CONFIG";
pub const ENV_BIND: &str = "RECIPES_BIND";
pub const ENV_BASE_URL: &str = "RECIPES_BASE_URL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "RECIPES_HTTP_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "RECIPES_PROXY_URL";
pub const ENV_FORWARD_AUTH: &str = "RECIPES_FORWARD_AUTH";

/// Per-domain overrides. Unset fields keep the domain's built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainSettings {
    pub route: Option<String>,
    pub models: Option<Vec<String>>,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainsSettings {
    pub cocktails: Option<DomainSettings>,
    pub cakes: Option<DomainSettings>,
}

impl DomainsSettings {
    /// Effective cocktail route: the override, else the built-in one.
    pub fn route_for_cocktails(&self) -> &str {
        configured_route(&self.cocktails).unwrap_or(cocktail::ROUTE)
    }

    pub fn route_for_cakes(&self) -> &str {
        configured_route(&self.cakes).unwrap_or(cake::ROUTE)
    }
}

fn configured_route(settings: &Option<DomainSettings>) -> Option<&str> {
    settings.as_ref().and_then(|s| s.route.as_deref())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub bind: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub proxy_url: Option<String>,
    /// Use the caller's bearer token for upstream calls when present.
    pub forward_authorization: bool,
    pub domains: DomainsSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            http_timeout_secs: 60,
            proxy_url: None,
            forward_authorization: false,
            domains: DomainsSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment: YAML file first, then env overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid YAML: {}", e),
                ErrorContext::new().with_source("server_config"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read config file: {}", e),
                ErrorContext::new()
                    .with_source("server_config")
                    .with_details(path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply environment overrides through `lookup`, which returns the value
    /// of a variable if it is set.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(bind) = get(ENV_BIND) {
            self.bind = bind;
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(secs) = get(ENV_HTTP_TIMEOUT_SECS) {
            self.http_timeout_secs = secs.parse().map_err(|_| {
                Error::configuration_with_context(
                    format!("not a number of seconds: {}", secs),
                    ErrorContext::new()
                        .with_field_path(ENV_HTTP_TIMEOUT_SECS)
                        .with_source("server_config"),
                )
            })?;
        }
        if let Some(proxy) = get(ENV_PROXY_URL) {
            self.proxy_url = Some(proxy);
        }
        if let Some(flag) = get(ENV_FORWARD_AUTH) {
            self.forward_authorization = parse_flag(&flag).ok_or_else(|| {
                Error::configuration_with_context(
                    format!("expected true/false, got {}", flag),
                    ErrorContext::new()
                        .with_field_path(ENV_FORWARD_AUTH)
                        .with_source("server_config"),
                )
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        validate_http_url("base_url", &self.base_url)?;
        if let Some(proxy) = &self.proxy_url {
            validate_http_url("proxy_url", proxy)?;
        }
        if self.http_timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("http_timeout_secs")
                    .with_source("server_config"),
            ));
        }

        for (name, settings) in [
            ("cocktails", &self.domains.cocktails),
            ("cakes", &self.domains.cakes),
        ] {
            let Some(models) = settings.as_ref().and_then(|s| s.models.as_ref()) else {
                continue;
            };
            if models.len() < 2 {
                return Err(Error::configuration_with_context(
                    format!("at least 2 models are required, got {}", models.len()),
                    ErrorContext::new()
                        .with_field_path(format!("domains.{}.models", name))
                        .with_source("server_config"),
                ));
            }
        }

        check_routes(&[
            ("cocktails", self.domains.route_for_cocktails()),
            ("cakes", self.domains.route_for_cakes()),
        ])
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|_| {
            Error::configuration_with_context(
                format!("invalid listen address: {}", self.bind),
                ErrorContext::new()
                    .with_field_path("bind")
                    .with_source("server_config"),
            )
        })
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            proxy_url: self.proxy_url.clone(),
        }
    }
}

/// Check a set of `(domain key, route)` pairs before they reach the router.
///
/// Each route must start with `/` and be served by one domain only; none
/// may take the health route.
pub fn check_routes(routes: &[(&str, &str)]) -> Result<()> {
    let route_error = |key: &str, message: String| {
        Error::configuration_with_context(
            message,
            ErrorContext::new()
                .with_field_path(format!("domains.{}.route", key))
                .with_source("server_config"),
        )
    };

    for (i, &(key, route)) in routes.iter().enumerate() {
        if !route.starts_with('/') {
            return Err(route_error(key, format!("route must start with '/': {}", route)));
        }
        if route == HEALTH_ROUTE {
            return Err(route_error(key, format!("route is reserved: {}", route)));
        }
        if let Some((other, _)) = routes[..i].iter().find(|(_, r)| *r == route) {
            return Err(route_error(
                key,
                format!("route {} is already served by domains.{}", route, other),
            ));
        }
    }
    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid URL {}: {}", value, e),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("server_config"),
        )
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::configuration_with_context(
            format!("unsupported URL scheme: {}", other),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("server_config"),
        )),
    }
}
