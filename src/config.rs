//! Application configuration loaded from environment variables.
//!
//! Credentials stay optional here so the server can boot without them and
//! show what is missing on the index page; the client constructors are the
//! ones that turn an absent key into a typed `AgentError::MissingCredential`.

use anyhow::{Context, Result};
use std::env;

pub const ENV_TAVILY_KEY: &str = "TAVILY_API_KEY";
pub const ENV_GEMINI_KEY: &str = "GEMINI_API_KEY";

const DEFAULT_SESSION_SECRET: &str = "dev-secret-key";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_DATABASE_URL: &str = "sqlite:searchbrief.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tavily_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    /// Signs the flash cookie. Falls back to a fixed dev default.
    pub session_secret: String,
    pub port: u16,
    pub database_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables. `.env` loading is the
    /// binary's job; this only reads the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            tavily_api_key: non_empty(env::var(ENV_TAVILY_KEY).ok()),
            gemini_api_key: non_empty(env::var(ENV_GEMINI_KEY).ok()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| DEFAULT_SESSION_SECRET.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        })
    }

    /// Credentials the pipeline needs but the environment does not provide.
    /// Shown as a banner on the index page.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tavily_api_key.is_none() {
            missing.push(ENV_TAVILY_KEY);
        }
        if self.gemini_api_key.is_none() {
            missing.push(ENV_GEMINI_KEY);
        }
        missing
    }
}

impl Default for AppConfig {
    /// A config with no credentials, suitable for tests and local boots.
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            gemini_api_key: None,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_lists_both_when_unset() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.missing_keys(), vec![ENV_TAVILY_KEY, ENV_GEMINI_KEY]);
    }

    #[test]
    fn missing_keys_empty_when_both_present() {
        let cfg = AppConfig {
            tavily_api_key: Some("tvly-x".into()),
            gemini_api_key: Some("g-x".into()),
            ..AppConfig::default()
        };
        assert!(cfg.missing_keys().is_empty());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(Some("k".into())), Some("k".into()));
    }
}
