//! Shared HTTP client construction

use crate::config::{IndexerConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for discovery and indexing requests
///
/// Timeouts are applied per request, not to the run as a whole.
///
/// # Example
///
/// ```
/// use oti_indexer::config::{IndexerConfig, UserAgentConfig};
/// use oti_indexer::http::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &IndexerConfig::default());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    indexer: &IndexerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(indexer.timeout_secs))
        .connect_timeout(Duration::from_secs(indexer.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}
