//! Study discovery
//!
//! This module resolves the ordered list of study ids to index. Two sources
//! are supported:
//! - a content API exposing `study_list`
//! - a repository contents listing of the `study` directory
//!
//! Each source also fixes how document URLs are built for the run, so the
//! listing endpoint and the URL strategy can never be mixed.

mod filter;
mod listing;
mod local_api;
mod repository;

pub use filter::StudyFilter;
pub use local_api::LocalApiSource;
pub use repository::RepositoryListingSource;

use crate::config::SourceConfig;
use crate::url::DocumentUrlBuilder;
use crate::{DiscoveryError, UrlError};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::future::Future;

/// Opaque identifier of a study within one source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct StudyId(String);

impl StudyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StudyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Ordered study ids for one run; order is processing order only
pub type StudyList = Vec<StudyId>;

/// Anything that can produce the study list for a run
pub trait StudyEnumerator {
    /// Fetches the complete study list, or fails without a partial result
    fn list_studies(&self) -> impl Future<Output = Result<StudyList, DiscoveryError>> + Send;
}

/// The configured study source for a run
#[derive(Debug, Clone)]
pub enum StudySource {
    LocalApi(LocalApiSource),
    RepositoryListing(RepositoryListingSource),
}

impl StudySource {
    /// Builds the source described by the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The source section of the configuration
    /// * `client` - HTTP client shared with the rest of the run
    pub fn from_config(config: &SourceConfig, client: Client) -> Result<Self, UrlError> {
        match config {
            SourceConfig::LocalApi { api_url } => {
                Ok(Self::LocalApi(LocalApiSource::new(api_url, client)?))
            }
            SourceConfig::Repository {
                contents_url,
                raw_url,
            } => Ok(Self::RepositoryListing(RepositoryListingSource::new(
                contents_url,
                raw_url,
                client,
            )?)),
        }
    }

    /// Document URL strategy paired with this source
    pub fn document_urls(&self) -> DocumentUrlBuilder {
        match self {
            Self::LocalApi(source) => source.document_urls(),
            Self::RepositoryListing(source) => source.document_urls(),
        }
    }

    /// The URL the study list is read from
    pub fn listing_url(&self) -> &str {
        match self {
            Self::LocalApi(source) => source.listing_url(),
            Self::RepositoryListing(source) => source.listing_url(),
        }
    }
}

impl StudyEnumerator for StudySource {
    async fn list_studies(&self) -> Result<StudyList, DiscoveryError> {
        match self {
            Self::LocalApi(source) => source.list_studies().await,
            Self::RepositoryListing(source) => source.list_studies().await,
        }
    }
}
