//! Backend connection settings.
//!
//! - `SCHOOLDESK_API_URL`: base URL of the REST backend (default: `http://localhost:3000/api`)
//! - `SCHOOLDESK_API_TIMEOUT_SECS`: per-request timeout in seconds (default: `10`)

use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config =
            Self::new(lookup("SCHOOLDESK_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()));
        config.timeout = Duration::from_secs(
            lookup("SCHOOLDESK_API_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        config
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
