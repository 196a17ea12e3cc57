// src/config.rs
// =============================================================================
// Runtime configuration for the gateway.
//
// Values come from the command line (or the matching environment variables,
// see cli.rs) and are validated once here, so the gateway can assume a usable
// base URL and a non-zero request limit.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_REQUESTS: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitHub REST API
    pub api_url: Url,
    /// Upper bound on simultaneously in-flight requests
    pub max_requests: usize,
    pub user_agent: String,
}

impl Config {
    pub fn new(api_url: &str, max_requests: usize) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .with_context(|| format!("Invalid API URL '{}'", api_url))?;

        if api_url.cannot_be_a_base() || !matches!(api_url.scheme(), "http" | "https") {
            return Err(anyhow!("API URL must be an http(s) URL: {}", api_url));
        }
        if max_requests == 0 {
            return Err(anyhow!("--max-requests must be at least 1"));
        }

        Ok(Self {
            api_url,
            max_requests,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }
}
