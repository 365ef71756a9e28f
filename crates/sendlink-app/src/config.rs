//! Gateway configuration.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Service base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Upper bound on a single request, access or blob fetch.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the send service API (e.g., `https://api.example/`)
    pub api_url: String,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("sendlink/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GatewayConfig {
    /// Replace the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Replace the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replace the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Access endpoint for a send, `{api}/sends/access/{id}`.
    ///
    /// The identifier is percent-encoded as a single path segment.
    pub fn access_url(&self, send_id: &str) -> String {
        format!(
            "{}/sends/access/{}",
            self.api_url.trim_end_matches('/'),
            utf8_percent_encode(send_id, PATH_SEGMENT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("sendlink/"));
    }

    #[test]
    fn setters_replace_fields() {
        let config = GatewayConfig::default()
            .with_api_url("https://api.example")
            .with_request_timeout(Duration::from_secs(5))
            .with_user_agent("test");

        assert_eq!(config.api_url, "https://api.example");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test");
    }

    #[test]
    fn access_url_joins_without_double_slash() {
        let config = GatewayConfig::default().with_api_url("https://api.example/");

        assert_eq!(config.access_url("7Gq2-x_y"), "https://api.example/sends/access/7Gq2-x_y");
    }

    #[test]
    fn access_url_encodes_identifier() {
        let config = GatewayConfig::default();

        assert_eq!(
            config.access_url("../admin?x"),
            "http://localhost:4000/sends/access/..%2Fadmin%3Fx"
        );
    }

    #[test]
    fn access_url_encodes_decoded_identifier_once() {
        let config = GatewayConfig::default();

        assert_eq!(config.access_url("a b"), "http://localhost:4000/sends/access/a%20b");
        assert_eq!(
            config.access_url("caf\u{e9}"),
            "http://localhost:4000/sends/access/caf%C3%A9"
        );
    }
}
