use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-001";
pub const DEFAULT_APIFY_API_URL: &str = "https://api.apify.com";
pub const DEFAULT_APIFY_ACTOR: &str = "bluelightco~jobscan-ai";

/// Application configuration loaded from environment variables.
///
/// Both API credentials are optional at startup: a missing Gemini key fails
/// analysis with a configuration error, a missing Apify token is sent as-is
/// and surfaces as a remote failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub apify_token: Option<String>,
    pub apify_api_url: String,
    pub apify_actor: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            apify_token: optional_env("APIFY_TOKEN"),
            apify_api_url: env_or("APIFY_API_URL", DEFAULT_APIFY_API_URL),
            apify_actor: env_or("APIFY_ACTOR", DEFAULT_APIFY_ACTOR),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Reads `key`, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
