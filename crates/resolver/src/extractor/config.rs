use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

/// Upper bound on request rounds per resolve call.
pub const DEFAULT_MAX_ROUNDS: usize = 8;

/// Configurable options for the resolver and its HTTP transport
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Overall timeout for a single HTTP request
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Headers added to every request
    pub headers: HeaderMap,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// Treat non-2xx responses as transport failures
    pub error_for_status: bool,

    /// Maximum number of request rounds a handler may drive before the
    /// resolve call fails
    pub max_rounds: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: ResolverConfig::get_default_headers(),
            follow_redirects: true,
            error_for_status: true,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl ResolverConfig {
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json, */*;q=0.8"),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers
    }
}

/// Builder for [`ResolverConfig`]
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Adds a header to every request. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.config.headers.insert(name, value);
            }
            _ => {
                tracing::warn!(header = name, "Invalid header; skipping");
            }
        }
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    pub fn error_for_status(mut self, enabled: bool) -> Self {
        self.config.error_for_status = enabled;
        self
    }

    /// Caps the request rounds of one resolve. At least one round is always allowed.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.config.max_rounds = rounds.max(1);
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ResolverConfig::builder()
            .timeout(Duration::from_secs(5))
            .max_rounds(3)
            .header("X-Test", "1")
            .header("bad header", "x")
            .build();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.headers.get("x-test").unwrap(), "1");
        assert!(config.headers.contains_key(reqwest::header::ACCEPT));
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_zero_round_cap_is_raised() {
        let config = ResolverConfig::builder().max_rounds(0).build();
        assert_eq!(config.max_rounds, 1);
    }

    #[test]
    fn test_default_round_cap() {
        assert_eq!(ResolverConfig::default().max_rounds, DEFAULT_MAX_ROUNDS);
    }
}
