//! Client configuration

use serde::{Deserialize, Serialize};

/// Environment variable naming the API base URL
pub const API_URL_ENV: &str = "CHATDESK_API_URL";

/// Used when no base URL is configured. A native client has no page origin
/// to fall back to, so "same origin" means the local development server.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat API. Empty means same origin.
    pub api_url: String,
}

impl Config {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Read `CHATDESK_API_URL` at boot, falling back to the value it had at
    /// build time.
    pub fn from_env() -> Self {
        Self::from_sources(std::env::var(API_URL_ENV).ok(), option_env!("CHATDESK_API_URL"))
    }

    fn from_sources(runtime: Option<String>, build_time: Option<&str>) -> Self {
        let api_url = runtime
            .filter(|v| !v.trim().is_empty())
            .or_else(|| build_time.map(str::to_string))
            .unwrap_or_default();

        Self::new(api_url.trim())
    }

    /// Base URL the API client should talk to
    pub fn resolved_api_url(&self) -> &str {
        match self.api_url.trim() {
            "" => DEFAULT_API_URL,
            url => url,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
