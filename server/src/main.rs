use anyhow::Context;
use page_extractor::assistant::GeminiAssistant;
use page_extractor::Extractor;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::Config;
use server::handlers::jwt::JwtKeys;
use server::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = db::init_db(&config.database_url)
        .await
        .context("failed to open database")?;
    let extractor = Extractor::new().context("failed to build HTTP client")?;
    let assistant = GeminiAssistant::new(config.gemini.clone())?;

    let state = AppState::new(
        pool,
        extractor,
        Arc::new(assistant),
        JwtKeys::new(&config.jwt_secret),
    );
    let app = create_app(state, config.client_url.clone());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
