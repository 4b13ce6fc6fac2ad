//! HTTP 服务层
//!
//! HTTP surface: one `POST` route per domain variant plus `GET /health`.

pub mod handler;
pub mod input;

use crate::config::{ServerConfig, check_routes};
use crate::domains::{CakeRecipe, CocktailRecipe, DomainConfig};
use crate::generation::GenerationProvider;
use crate::types::RecipeKind;
use crate::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::info;

pub use handler::{ApiError, RecipeEndpoint, handle_recipes, health};
pub use input::read_request;

pub const HEALTH_ROUTE: &str = "/health";

/// Router serving a single domain.
pub fn domain_router<R: RecipeKind>(config: DomainConfig, provider: GenerationProvider) -> Result<Router> {
    config.preflight()?;
    let route = config.route.clone();
    let endpoint = RecipeEndpoint::<R>::new(config, provider)?;
    info!(
        route = %route,
        domain = R::DOMAIN,
        models = ?endpoint.config().model_ids,
        "recipe route ready"
    );
    Ok(Router::new()
        .route(&route, post(handle_recipes::<R>))
        .with_state(Arc::new(endpoint)))
}

/// Build the application router from explicit domain configs.
///
/// Routes that collide with each other or with the health route are a
/// configuration error.
pub fn build_app(
    cocktails: DomainConfig,
    cakes: DomainConfig,
    provider: GenerationProvider,
) -> Result<Router> {
    check_routes(&[
        ("cocktails", cocktails.route.as_str()),
        ("cakes", cakes.route.as_str()),
    ])?;
    Ok(Router::new()
        .route(HEALTH_ROUTE, get(health))
        .merge(domain_router::<CocktailRecipe>(cocktails, provider.clone())?)
        .merge(domain_router::<CakeRecipe>(cakes, provider)?))
}

/// Build the application router from server configuration.
pub fn build_app_from_config(config: &ServerConfig, provider: GenerationProvider) -> Result<Router> {
    let cocktails = CocktailRecipe::default_config()?.with_overrides(config.domains.cocktails.as_ref());
    let cakes = CakeRecipe::default_config()?.with_overrides(config.domains.cakes.as_ref());
    build_app(cocktails, cakes, provider)
}
