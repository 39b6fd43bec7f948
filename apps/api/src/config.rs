use anyhow::{Context, Result};

use crate::llm_client::backends::{DEFAULT_PRIMARY_MODEL, DEFAULT_SECONDARY_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub primary_model_url: String,
    pub primary_model_id: String,
    /// Unset means the secondary (chat) model is unavailable.
    pub secondary_model_url: Option<String>,
    pub secondary_model_id: String,
    pub model_api_token: Option<String>,
    /// Unset means backend calls wait indefinitely.
    pub model_timeout_secs: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            primary_model_url: require_env("PRIMARY_MODEL_URL")?,
            primary_model_id: optional_env("PRIMARY_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_PRIMARY_MODEL.to_string()),
            secondary_model_url: optional_env("SECONDARY_MODEL_URL"),
            secondary_model_id: optional_env("SECONDARY_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_SECONDARY_MODEL.to_string()),
            model_api_token: optional_env("MODEL_API_TOKEN"),
            model_timeout_secs: optional_env("MODEL_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("MODEL_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
