use crate::DiscoveryError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

/// Reads a JSON listing from `url`, surfacing status and body on failure
///
/// Error classification:
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection refused, timeout, unreadable body | `Transport` |
/// | Non-2xx status | `Status` with the response body |
/// | Body not in the expected shape | `Parse` |
pub(crate) async fn fetch_listing<T: DeserializeOwned>(
    client: &Client,
    url: &Url,
) -> Result<T, DiscoveryError> {
    tracing::debug!("Fetching study listing from {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| DiscoveryError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| DiscoveryError::Transport {
            url: url.to_string(),
            source,
        })?;

    if !status.is_success() {
        return Err(DiscoveryError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| DiscoveryError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
