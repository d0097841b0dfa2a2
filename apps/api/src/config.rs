use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::chat::ChatVariant;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
///
/// A missing `GOOGLE_API_KEY` is not a startup failure: the service runs in
/// degraded mode and every AI action reports the missing credential instead.
/// Malformed optional values still fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub chat_variant: ChatVariant,
    pub session_idle_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: optional_env("GOOGLE_API_KEY"),
            model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            chat_variant: optional_env("OHS_CHAT_VARIANT")
                .map(|v| ChatVariant::from_str(&v))
                .transpose()?
                .unwrap_or_default(),
            session_idle_timeout: Duration::from_secs(
                60 * optional_env("SESSION_IDLE_MINUTES")
                    .unwrap_or_else(|| "60".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
            ),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn is_degraded(&self) -> bool {
        self.google_api_key.is_none()
    }
}

impl FromStr for ChatVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" => Ok(ChatVariant::Agent),
            "simple" => Ok(ChatVariant::Simple),
            other => Err(anyhow!(
                "OHS_CHAT_VARIANT must be 'agent' or 'simple', got '{other}'"
            )),
        }
    }
}

/// Reads an env var, treating blank values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Config used by handler tests; never touches the process environment.
    pub fn for_tests(google_api_key: Option<&str>) -> Self {
        Config {
            google_api_key: google_api_key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            chat_variant: ChatVariant::Agent,
            session_idle_timeout: Duration::from_secs(3600),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
