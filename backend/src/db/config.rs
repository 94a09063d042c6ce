//! Analysis server configuration and environment variable handling.

use std::env;

/// Configuration for connecting to the analysis server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

pub(crate) const DEFAULT_TIMEOUT_SEC: u64 = 30;
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 2;
pub(crate) const DEFAULT_RETRY_DELAY_MS: u64 = 200;

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            timeout_sec: DEFAULT_TIMEOUT_SEC,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RemoteConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `ANALYSIS_SERVER_URL` (required): Base URL of the analysis server
    /// - `ANALYSIS_SERVER_TOKEN` (optional): Bearer token
    /// - `ANALYSIS_TIMEOUT_SEC` (optional, default: 30): Request timeout in seconds
    /// - `ANALYSIS_MAX_RETRIES` (optional, default: 2): Maximum retry attempts
    /// - `ANALYSIS_RETRY_DELAY_MS` (optional, default: 200): Initial retry delay
    ///
    /// # Errors
    /// Returns an error if the base URL is not set or a numeric variable does not parse.
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("ANALYSIS_SERVER_URL")
            .map_err(|_| "ANALYSIS_SERVER_URL environment variable not set".to_string())?;

        let token = env::var("ANALYSIS_SERVER_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let timeout_sec = parse_env("ANALYSIS_TIMEOUT_SEC", DEFAULT_TIMEOUT_SEC)?;
        let max_retries = parse_env("ANALYSIS_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        let retry_delay_ms = parse_env("ANALYSIS_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a base URL and default tuning.
    pub fn with_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}
