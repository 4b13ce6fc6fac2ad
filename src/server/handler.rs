//! The generic recipe handler shared by every domain variant.

use crate::domains::DomainConfig;
use crate::generation::{GenerationProvider, RequestContext};
use crate::pipeline::FallbackController;
use crate::server::input::read_request;
use crate::types::{RecipeKind, RecipeSet};
use crate::{Error, Result};
use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::json;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

/// `error` text of the 502 envelope.
pub const UPSTREAM_FAILURE: &str = "Model did not return valid JSON";
/// `error` text of the 500 envelope.
pub const REQUEST_FAILURE: &str = "Bad request or server error";
/// `detail` of a 502 when the last failure carried no message.
pub const UNKNOWN_MODEL_ERROR: &str = "Unknown model error";

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// JSON error envelope `{ error, detail }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn upstream(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            error: UPSTREAM_FAILURE,
            detail: detail.into(),
        }
    }

    pub fn request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: REQUEST_FAILURE,
            detail: detail.into(),
        }
    }

    /// Map a crate error: exhausted fallback is an upstream failure, anything
    /// else a request or internal failure.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::FallbackExhausted { .. } => {
                Self::upstream(err.last_message().unwrap_or(UNKNOWN_MODEL_ERROR))
            }
            other => Self::request(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.status.as_u16(), self.error, self.detail)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.error, "detail": self.detail }));
        (self.status, body).into_response()
    }
}

/// Per-domain handler state.
pub struct RecipeEndpoint<R> {
    config: DomainConfig,
    fallback: FallbackController,
    provider: GenerationProvider,
    _kind: PhantomData<fn() -> R>,
}

impl<R: RecipeKind> RecipeEndpoint<R> {
    pub fn new(config: DomainConfig, provider: GenerationProvider) -> Result<Self> {
        let fallback = FallbackController::new(config.model_ids.clone())?;
        Ok(Self {
            config,
            fallback,
            provider,
            _kind: PhantomData,
        })
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    async fn respond(&self, ctx: RequestContext, body: std::result::Result<Bytes, BytesRejection>) -> Response {
        let route = self.config.route.as_str();

        let body = match body {
            Ok(body) => body,
            Err(rejection) => {
                error!(route, stage = "read_input", error = %rejection, "cannot read request body");
                return ApiError::request(rejection.body_text()).into_response();
            }
        };

        let request = match read_request(&body) {
            Ok(request) => request,
            Err(e) => {
                error!(route, stage = "read_input", error = %e, "malformed request");
                return ApiError::from_error(&e).into_response();
            }
        };

        let generator = match self.provider.for_request(&ctx) {
            Ok(generator) => generator,
            Err(e) => {
                error!(route, stage = "bind_provider", error = %e, "cannot bind generator");
                return ApiError::from_error(&e).into_response();
            }
        };

        let generation = self.config.generation_request(&request);
        match self
            .fallback
            .run(generator.as_ref(), &generation, RecipeSet::<R>::from_value)
            .await
        {
            Ok(success) => {
                info!(
                    route,
                    model = %success.model,
                    recipes = success.value.len(),
                    failed_attempts = success.failures.len(),
                    "recipes generated"
                );
                Json(success.value).into_response()
            }
            Err(e) => {
                error!(
                    route,
                    stage = "generate",
                    code = e.failure_class().code(),
                    error = %e,
                    "recipe generation failed"
                );
                ApiError::from_error(&e).into_response()
            }
        }
    }
}

/// `POST` handler for one domain.
pub async fn handle_recipes<R: RecipeKind>(
    State(endpoint): State<Arc<RecipeEndpoint<R>>>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let mut ctx = RequestContext::new(request_id.clone());
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        ctx = ctx.with_authorization(auth);
    }

    let span = info_span!(
        "recipes",
        route = %endpoint.config.route,
        domain = R::DOMAIN,
        request_id = %request_id
    );
    let mut response = endpoint.respond(ctx, body).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
