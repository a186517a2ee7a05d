//! Client configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (`--base-url`)
//! 2. Environment variables (`ECOPACK_API_URL`, ...)
//! 3. Built-in defaults (local Flask backend on 127.0.0.1:5000)

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 28;
const DEFAULT_REVEAL_DELAY_MS: u64 = 300;
const DEFAULT_NOTICE_TTL_SECS: u64 = 4;
const HEALTH_TIMEOUT_SECS: u64 = 5;

const ENV_BASE_URL: &str = "ECOPACK_API_URL";
const ENV_TIMEOUT_SECS: &str = "ECOPACK_TIMEOUT_SECS";
const ENV_REVEAL_DELAY_MS: &str = "ECOPACK_REVEAL_DELAY_MS";
const ENV_NOTICE_TTL_SECS: &str = "ECOPACK_NOTICE_TTL_SECS";

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the prediction service, without trailing `/predict`.
    pub base_url: String,
    /// Hard limit for a single `/predict` call.
    pub request_timeout: Duration,
    /// Pause between a request settling and the results reveal.
    pub reveal_delay: Duration,
    /// How long an error notice stays visible.
    pub notice_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            notice_ttl: Duration::from_secs(DEFAULT_NOTICE_TTL_SECS),
        }
    }
}

impl ClientConfig {
    /// Build from environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(secs) = env_u64(ENV_TIMEOUT_SECS)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = env_u64(ENV_REVEAL_DELAY_MS)? {
            config.reveal_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64(ENV_NOTICE_TTL_SECS)? {
            config.notice_ttl = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate; return an error string if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            ));
        }
        if self.request_timeout.is_zero() {
            return Err("request_timeout must be > 0".to_string());
        }
        Ok(())
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(None),
    }
}

/// Check if the prediction backend is reachable (GET on its root banner).
pub async fn check_endpoint(base_url: &str) -> bool {
    let url = format!("{}/", base_url.trim_end_matches('/'));
    match reqwest::Client::new()
        .get(&url)
        .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
        .send()
        .await
    {
        Ok(resp) => resp.status().is_success(),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Health check failed");
            false
        }
    }
}
