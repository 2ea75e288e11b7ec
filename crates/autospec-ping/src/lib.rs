//! AutoSpec Ping
//!
//! Announces the sitemap to search engine ping endpoints after a deploy.
//! Each endpoint is tried once; a failure is reported and the remaining
//! endpoints are still attempted.

use std::time::Duration;

use autospec_core::config::PingConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;
use tracing::{info, warn};

/// Characters left unescaped in query values (`-`, `_`, `.`, `~`).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const USER_AGENT: &str = concat!("autospec-ping/", env!("CARGO_PKG_VERSION"));

/// Ping errors.
#[derive(Debug, Error)]
pub enum PingError {
    /// HTTP client or transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Result type for ping operations.
pub type Result<T> = std::result::Result<T, PingError>;

/// Outcome of one endpoint request.
#[derive(Debug)]
pub enum PingOutcome {
    /// The endpoint accepted the ping.
    Ok { url: String, status: u16 },

    /// The request failed or was rejected.
    Failed { url: String, error: PingError },
}

impl PingOutcome {
    /// Whether the endpoint accepted the ping.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The full request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Ok { url, .. } | Self::Failed { url, .. } => url,
        }
    }
}

/// Encode `value` for use as a query parameter, spaces as `+`.
#[must_use]
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE)
        .to_string()
        .replace("%20", "+")
}

/// Request URL announcing `sitemap_url` to `endpoint`.
#[must_use]
pub fn ping_url(endpoint: &str, sitemap_url: &str) -> String {
    format!("{endpoint}{}", encode_query_value(sitemap_url))
}

/// Search engine pinger.
#[derive(Debug)]
pub struct Pinger {
    client: reqwest::blocking::Client,
    endpoints: Vec<String>,
}

impl Pinger {
    /// Create a pinger for `endpoints` with a per-request `timeout`.
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Create a pinger from the `[ping]` configuration section.
    pub fn from_config(config: &PingConfig) -> Result<Self> {
        Self::new(
            config.endpoints.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Configured endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Send a single GET to `url` and return the response status.
    pub fn ping(&self, url: &str) -> Result<u16> {
        let response = self.client.get(url).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(PingError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(status.as_u16())
    }

    /// Announce `sitemap_url` to every endpoint, in order.
    pub fn ping_all(&self, sitemap_url: &str) -> Vec<PingOutcome> {
        self.endpoints
            .iter()
            .map(|endpoint| {
                let url = ping_url(endpoint, sitemap_url);
                match self.ping(&url) {
                    Ok(status) => {
                        info!(url = %url, status, "pinged");
                        PingOutcome::Ok { url, status }
                    }
                    Err(error) => {
                        warn!(url = %url, error = %error, "ping failed");
                        PingOutcome::Failed { url, error }
                    }
                }
            })
            .collect()
    }
}
