//! 失败分类：为每次生成尝试的失败标注标准类别。
//!
//! Failure classification for generation attempts.
//!
//! Every failed attempt inside the fallback controller is tagged with a
//! [`FailureClass`] so operators can tell a throttled provider from a model
//! that produced unusable output. The class is informational: the controller
//! moves on to the next model identifier regardless of the class.
//!
//! | Prefix | Category | Description                        |
//! |--------|----------|------------------------------------|
//! | E1xxx  | client   | The provider rejected the request  |
//! | E2xxx  | rate     | Throttling                         |
//! | E3xxx  | server   | Provider-side or network failures  |
//! | E5xxx  | output   | The model answered, but unusably   |
//! | E9xxx  | unknown  | Catch-all                          |
//!
//! ## Example
//!
//! ```rust
//! use ai_recipes::error_code::FailureClass;
//!
//! let class = FailureClass::from_http_status(429);
//! assert_eq!(class.code(), "E2001");
//! assert_eq!(class.category(), "rate");
//! ```

use std::fmt;

/// Classified reason for a failed generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// E1001: Provider rejected the request parameters (e.g. schema unsupported by the model)
    InvalidRequest,
    /// E1002: Invalid, expired, or missing API key
    Authentication,
    /// E1003: Credentials lack access to the model
    PermissionDenied,
    /// E1004: Model identifier not enabled or unknown to the provider
    NotFound,
    /// E1005: Prompt exceeds the model's context window
    RequestTooLarge,
    /// E2001: Request rate or quota exceeded
    RateLimited,
    /// E3001: Internal server error on provider side
    ServerError,
    /// E3002: Provider temporarily overloaded
    Overloaded,
    /// E3003: Request timed out before a response was received
    Timeout,
    /// E3004: Connection could not be established or was dropped
    Network,
    /// E5001: Model output was missing, refused, unparseable, or off-schema
    InvalidOutput,
    /// E9999: Could not be classified
    Unknown,
}

impl FailureClass {
    /// Returns the canonical code string (e.g., `"E1001"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "E1001",
            Self::Authentication => "E1002",
            Self::PermissionDenied => "E1003",
            Self::NotFound => "E1004",
            Self::RequestTooLarge => "E1005",
            Self::RateLimited => "E2001",
            Self::ServerError => "E3001",
            Self::Overloaded => "E3002",
            Self::Timeout => "E3003",
            Self::Network => "E3004",
            Self::InvalidOutput => "E5001",
            Self::Unknown => "E9999",
        }
    }

    /// Returns the standard name (e.g., `"invalid_output"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RequestTooLarge => "request_too_large",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::InvalidOutput => "invalid_output",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the category: `"client"`, `"rate"`, `"server"`, `"output"`, or `"unknown"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest
            | Self::Authentication
            | Self::PermissionDenied
            | Self::NotFound
            | Self::RequestTooLarge => "client",
            Self::RateLimited => "rate",
            Self::ServerError | Self::Overloaded | Self::Timeout | Self::Network => "server",
            Self::InvalidOutput => "output",
            Self::Unknown => "unknown",
        }
    }

    /// Maps an HTTP status code from the provider to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            413 => Self::RequestTooLarge,
            429 => Self::RateLimited,
            503 | 529 => Self::Overloaded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Maps a provider error `type`/`code` string (OpenAI style) to a class.
    pub fn from_provider_code(provider_code: &str) -> Option<Self> {
        let class = match provider_code {
            "invalid_request_error" | "invalid_request" => Self::InvalidRequest,
            "invalid_api_key" | "authentication_error" => Self::Authentication,
            "permission_error" | "permission_denied" => Self::PermissionDenied,
            "model_not_found" | "not_found" => Self::NotFound,
            "context_length_exceeded" => Self::RequestTooLarge,
            "rate_limit_exceeded" | "insufficient_quota" => Self::RateLimited,
            "server_error" => Self::ServerError,
            "overloaded" | "overloaded_error" => Self::Overloaded,
            _ => return None,
        };
        Some(class)
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert_eq!(FailureClass::from_http_status(400), FailureClass::InvalidRequest);
        assert_eq!(FailureClass::from_http_status(401), FailureClass::Authentication);
        assert_eq!(FailureClass::from_http_status(404), FailureClass::NotFound);
        assert_eq!(FailureClass::from_http_status(429), FailureClass::RateLimited);
        assert_eq!(FailureClass::from_http_status(500), FailureClass::ServerError);
        assert_eq!(FailureClass::from_http_status(502), FailureClass::ServerError);
        assert_eq!(FailureClass::from_http_status(503), FailureClass::Overloaded);
        assert_eq!(FailureClass::from_http_status(504), FailureClass::Timeout);
        assert_eq!(FailureClass::from_http_status(302), FailureClass::Unknown);
    }

    #[test]
    fn test_provider_code_aliases() {
        assert_eq!(
            FailureClass::from_provider_code("model_not_found"),
            Some(FailureClass::NotFound)
        );
        assert_eq!(
            FailureClass::from_provider_code("insufficient_quota"),
            Some(FailureClass::RateLimited)
        );
        assert_eq!(FailureClass::from_provider_code("something_else"), None);
    }

    #[test]
    fn test_codes_and_categories() {
        assert_eq!(FailureClass::InvalidOutput.code(), "E5001");
        assert_eq!(FailureClass::InvalidOutput.category(), "output");
        assert_eq!(FailureClass::Network.category(), "server");
        assert_eq!(FailureClass::Unknown.to_string(), "E9999");
    }
}
