//! OTI Indexer: batch indexing client for phylesystem studies
//!
//! This crate enumerates the studies published by a content API (or a
//! repository listing) and asks an OTI indexing service to index each one,
//! collecting per-study outcomes into a run summary.

pub mod config;
pub mod http;
pub mod indexer;
pub mod output;
pub mod source;
pub mod url;

use thiserror::Error;

/// Main error type for indexing runs
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Study discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No indexing service URL was given")]
    MissingIndexerUrl,
}

/// Errors raised while obtaining the study list
///
/// Any of these aborts the run: a partial study list cannot be detected, so
/// it is never used.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not parse study list from {url}: {message}")]
    Parse { url: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    #[error("Study id {0:?} cannot be used as a URL path segment")]
    InvalidStudyId(String),
}

/// Result type alias for indexing operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use indexer::{run_indexing, IndexingOutcome, OtiSubmitter, RunOptions, Submitter};
pub use output::RunSummary;
pub use source::{StudyEnumerator, StudyFilter, StudyId, StudyList, StudySource};
pub use crate::url::{normalize_base_url, DocumentUrlBuilder};
