use std::fmt;
use std::time::Duration;

use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Connection settings for the chat completions API.
///
/// Fixed once built: the `with_*` methods consume and return a new value, so a
/// config handed to an HTTP client never changes underneath it.
///
/// | Variable            | Default                     |
/// |---------------------|-----------------------------|
/// | `OPENAI_API_KEY`    | required                    |
/// | `OPENAI_BASE_URL`   | `https://api.openai.com/v1` |
/// | `OPENAI_TIMEOUT_MS` | `60000`                     |
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    api_key: String,
    content_type: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: api_key.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| DomainError::invalid_input("API key not set: OPENAI_API_KEY"))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = lookup("OPENAI_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                DomainError::invalid_input(format!("OPENAI_TIMEOUT_MS is not a number: {raw}"))
            })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Full URL for a path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &"<redacted>")
            .field("content_type", &self.content_type)
            .finish()
    }
}
