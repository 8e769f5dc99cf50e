use crate::UrlError;
use url::Url;

/// Normalizes a base URL so that relative endpoints can be appended to it
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Reject URLs that cannot carry a path (e.g. `mailto:`)
/// 4. Collapse any run of trailing slashes into exactly one
/// 5. Remove fragment (everything after #)
///
/// The host is lowercased by the parser itself.
///
/// # Arguments
///
/// * `url_str` - The base URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized base URL whose path ends in `/`
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use oti_indexer::url::normalize_base_url;
///
/// let with_slash = normalize_base_url("http://localhost:7474/db/data/").unwrap();
/// let without = normalize_base_url("http://localhost:7474/db/data").unwrap();
/// assert_eq!(with_slash, without);
/// assert_eq!(with_slash.as_str(), "http://localhost:7474/db/data/");
/// ```
pub fn normalize_base_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{trimmed}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(trimmed.to_string()));
    }

    let path = format!("{}/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_fragment(None);

    Ok(url)
}

/// Resolves an endpoint path against a normalized base URL
///
/// Leading slashes on `endpoint` are ignored so that the endpoint is always
/// appended below the base path instead of replacing it.
pub fn join_endpoint(base: &Url, endpoint: &str) -> Result<Url, UrlError> {
    base.join(endpoint.trim_start_matches('/'))
        .map_err(|e| UrlError::Parse(format!("{}{}: {}", base, endpoint, e)))
}
