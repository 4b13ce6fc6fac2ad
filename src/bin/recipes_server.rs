use ai_recipes::config::ServerConfig;
use ai_recipes::generation::OpenAiProvider;
use ai_recipes::server::build_app_from_config;
use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ai_recipes=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::load().context("load configuration")?;
    if config.api_key.is_none() && !config.forward_authorization {
        warn!("OPENAI_API_KEY is not set; every generation request will fail");
    }

    let provider = OpenAiProvider::from_config(&config).context("build model provider")?;
    let app = build_app_from_config(&config, provider).context("build router")?;

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    info!(addr = %addr, base_url = %config.base_url, "recipes server listening");
    axum::serve(listener, app).await.context("serve")
}
