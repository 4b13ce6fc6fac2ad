//! # ai-recipes
//!
//! 基于结构化 LLM 输出的场景化食谱生成服务，支持鸡尾酒与蛋糕两个领域。
//!
//! Occasion-driven recipe generation: a caller describes a mood and an
//! occasion, and receives a small set of recipes (cocktails or cakes) that
//! satisfy a closed JSON schema.
//!
//! ## Overview
//!
//! Each request flows through the same pipeline regardless of domain:
//!
//! 1. the input reader turns the raw body into a [`RecipeRequest`];
//! 2. the prompt builder renders the system and user instructions;
//! 3. the fallback controller tries each configured model in order;
//! 4. the schema-constrained generator returns a conforming value or fails;
//! 5. the handler writes the recipes, or a `{ error, detail }` envelope.
//!
//! Both domains are instances of one generic handler, parameterized by a
//! [`domains::DomainConfig`] and a [`types::RecipeKind`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_recipes::config::ServerConfig;
//! use ai_recipes::generation::OpenAiProvider;
//! use ai_recipes::server::build_app_from_config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     let provider = OpenAiProvider::from_config(&config)?;
//!     let app = build_app_from_config(&config, provider)?;
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Server configuration from YAML and environment |
//! | [`domains`] | Cocktail and cake variants |
//! | [`drivers`] | Provider wire-format adaptation |
//! | [`generation`] | Schema-constrained generator capability |
//! | [`pipeline`] | Ordered model fallback |
//! | [`prompt`] | System and user prompt rendering |
//! | [`server`] | axum router and handlers |
//! | [`structured`] | Schema building, default filling, validation |
//! | [`transport`] | Outbound HTTP client |
//! | [`types`] | Request and recipe data model |

pub mod config;
pub mod domains;
pub mod drivers;
pub mod error_code;
pub mod generation;
pub mod pipeline;
pub mod prompt;
pub mod server;
pub mod structured;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use config::ServerConfig;
pub use domains::{CakeRecipe, CocktailRecipe, DomainConfig};
pub use error_code::FailureClass;
pub use generation::{GenerationProvider, StructuredGenerator};
pub use pipeline::FallbackController;
pub use types::{Ingredient, RecipeKind, RecipeRequest, RecipeSet};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
