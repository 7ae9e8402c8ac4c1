use axum::http::HeaderValue;
use page_extractor::assistant::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime settings. Secrets only live here and are handed to the
/// components that need them at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub client_url: HeaderValue,
    pub jwt_secret: String,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let client_url = optional("CLIENT_URL", "http://localhost:5173");
        let client_url = client_url
            .parse::<HeaderValue>()
            .map_err(|e| ConfigError::Invalid {
                name: "CLIENT_URL",
                reason: e.to_string(),
            })?;

        let gemini = GeminiConfig::new(required("GEMINI_API_KEY")?)
            .with_model(optional("GEMINI_MODEL", DEFAULT_MODEL))
            .with_base_url(optional("GEMINI_BASE_URL", DEFAULT_BASE_URL));

        Ok(Self {
            database_url: optional("DATABASE_URL", "sqlite://pagechat.db?mode=rwc"),
            bind_addr: optional("BIND_ADDR", "127.0.0.1:3000"),
            client_url,
            jwt_secret: required("JWT_SECRET")?,
            gemini,
        })
    }
}
