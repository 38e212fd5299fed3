use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default except `DATABASE_URL`, whose absence selects the
/// in-memory store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prediction backend: predict, career details, universities, roadmap, analysis.
    pub backend_url: String,
    /// Chat backend.
    pub ai_url: String,
    pub database_url: Option<String>,
    pub upstream_timeout: Duration,
    /// Funnel sessions older than this are discarded.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?;

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .context("SESSION_TTL_SECS must be a whole number of seconds")?;

        Ok(Config {
            backend_url: base_url("BACKEND_URL", "http://localhost:5050"),
            ai_url: base_url("AI_URL", "http://localhost:5001"),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            session_ttl: Duration::from_secs(session_ttl_secs),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a base URL, falling back to `default`. Trailing slashes are dropped so
/// endpoint paths can be appended verbatim.
fn base_url(key: &str, default: &str) -> String {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    normalize_base_url(&raw)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
