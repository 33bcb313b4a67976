use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// How the batch sync paces consecutive items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacerKind {
    FixedInterval,
    TokenBucket,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub hh_client_id: String,
    pub hh_client_secret: String,
    pub hh_redirect_uri: String,
    pub hh_oauth_url: String,
    pub hh_api_url: String,
    pub hh_user_agent: String,
    pub airtable_api_key: String,
    pub airtable_base_id: String,
    pub airtable_table: String,
    pub airtable_api_url: String,
    pub tokens_file: PathBuf,
    pub dedup_timeout: Duration,
    pub batch_delay: Duration,
    pub batch_pacer: PacerKind,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            hh_client_id: require_env("HH_CLIENT_ID")?,
            hh_client_secret: require_env("HH_CLIENT_SECRET")?,
            hh_redirect_uri: require_env("HH_REDIRECT_URI")?,
            hh_oauth_url: env_or("HH_OAUTH_URL", "https://hh.ru"),
            hh_api_url: env_or("HH_API_URL", "https://api.hh.ru"),
            hh_user_agent: env_or("HH_USER_AGENT", "HH-Airtable-App/1.0"),
            airtable_api_key: require_env("AIRTABLE_API_KEY")?,
            airtable_base_id: require_env("AIRTABLE_BASE_ID")?,
            airtable_table: env_or("AIRTABLE_TABLE", "People"),
            airtable_api_url: env_or("AIRTABLE_API_URL", "https://api.airtable.com"),
            tokens_file: PathBuf::from(env_or("TOKENS_FILE", "stored_tokens.json")),
            dedup_timeout: Duration::from_millis(
                env_or("DEDUP_TIMEOUT_MS", "5000")
                    .parse::<u64>()
                    .context("DEDUP_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            batch_delay: Duration::from_millis(
                env_or("BATCH_DELAY_MS", "1000")
                    .parse::<u64>()
                    .context("BATCH_DELAY_MS must be a number of milliseconds")?,
            ),
            batch_pacer: parse_pacer(&env_or("BATCH_PACER", "fixed"))?,
            port: env_or("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Points every upstream at one mock server.
    pub fn for_tests(upstream_url: &str, tokens_file: PathBuf) -> Self {
        Config {
            hh_client_id: "client".into(),
            hh_client_secret: "secret".into(),
            hh_redirect_uri: "http://localhost:3000/callback".into(),
            hh_oauth_url: upstream_url.to_string(),
            hh_api_url: upstream_url.to_string(),
            hh_user_agent: "test-agent".into(),
            airtable_api_key: "key".into(),
            airtable_base_id: "appBase".into(),
            airtable_table: "People".into(),
            airtable_api_url: upstream_url.to_string(),
            tokens_file,
            dedup_timeout: Duration::from_secs(5),
            batch_delay: Duration::ZERO,
            batch_pacer: PacerKind::FixedInterval,
            port: 0,
            rust_log: "debug".into(),
        }
    }
}

fn parse_pacer(value: &str) -> Result<PacerKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fixed" | "fixed_interval" => Ok(PacerKind::FixedInterval),
        "token_bucket" | "bucket" => Ok(PacerKind::TokenBucket),
        other => bail!("BATCH_PACER must be 'fixed' or 'token_bucket', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
