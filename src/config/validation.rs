use crate::config::types::{Config, IndexerConfig, SourceConfig, UserAgentConfig};
use crate::url::normalize_base_url;
use crate::ConfigError;

/// Upper bound on in-flight indexing requests
pub const MAX_CONCURRENT_SUBMISSIONS: usize = 32;

/// Validates the entire configuration
///
/// The indexing service URL may still be absent here; the run entry point
/// reports that separately as a usage error.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_indexer_config(&config.indexer)?;
    validate_source_config(&config.source)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates indexing service configuration
fn validate_indexer_config(config: &IndexerConfig) -> Result<(), ConfigError> {
    if let Some(url) = &config.url {
        validate_base_url("indexer.url", url)?;
    }

    if config.index_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "index-path cannot be empty".to_string(),
        ));
    }

    if config.max_concurrent_submissions < 1
        || config.max_concurrent_submissions > MAX_CONCURRENT_SUBMISSIONS
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-submissions must be between 1 and {}, got {}",
            MAX_CONCURRENT_SUBMISSIONS, config.max_concurrent_submissions
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the study source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    match config {
        SourceConfig::LocalApi { api_url } => validate_base_url("source.api-url", api_url),
        SourceConfig::Repository {
            contents_url,
            raw_url,
        } => {
            validate_base_url("source.contents-url", contents_url)?;
            validate_base_url("source.raw-url", raw_url)
        }
    }
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "client-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.client_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        url::Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    normalize_base_url(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", field, e)))
}
