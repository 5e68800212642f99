//! Mock server connection settings.

/// Environment variable holding the mock server `host:port`.
pub const ENDPOINT_ENV: &str = "UP4W_MS_STORE_MOCK_ENDPOINT";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "UP4W_MS_STORE_MOCK_TIMEOUT_SECONDS";

/// Where nothing listens: calls fail fast when the endpoint is not configured.
const DEFAULT_ENDPOINT: &str = "127.0.0.1:9";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Settings for [`MockContext`](crate::MockContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Mock server address as `host:port`, without the scheme.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl MockConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let endpoint = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("{ENDPOINT_ENV} not set, using {DEFAULT_ENDPOINT}");
                DEFAULT_ENDPOINT.to_string()
            });

        let timeout_seconds = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Self {
            endpoint,
            timeout_seconds,
        }
    }

    /// Set the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("http://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MockConfig::default();
        assert_eq!(config.endpoint, "127.0.0.1:9");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn test_builder_pattern() {
        let config = MockConfig::new()
            .with_endpoint("localhost:56567/")
            .with_timeout_seconds(2);

        assert_eq!(config.base_url(), "http://localhost:56567");
        assert_eq!(config.timeout_seconds, 2);
    }

    #[test]
    fn test_scheme_is_kept() {
        let config = MockConfig::new().with_endpoint("http://127.0.0.1:8080");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }
}
