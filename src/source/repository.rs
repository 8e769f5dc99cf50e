use crate::source::listing::fetch_listing;
use crate::source::{StudyEnumerator, StudyId, StudyList};
use crate::url::{join_endpoint, normalize_base_url, DocumentUrlBuilder};
use crate::{DiscoveryError, UrlError};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Directory listing endpoint below the repository contents base
const STUDY_DIR_ENDPOINT: &str = "contents/study";

/// One entry of a repository directory listing; other fields are ignored
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: StudyId,
}

/// Study source backed by a remote repository's contents API
///
/// `GET {contents_base}/contents/study` returns an array of entries whose
/// `name` is the study id. Documents are read from the raw file host.
#[derive(Debug, Clone)]
pub struct RepositoryListingSource {
    client: Client,
    listing_url: Url,
    documents: DocumentUrlBuilder,
}

impl RepositoryListingSource {
    pub fn new(contents_base: &str, raw_base: &str, client: Client) -> Result<Self, UrlError> {
        let contents_base = normalize_base_url(contents_base)?;
        let listing_url = join_endpoint(&contents_base, STUDY_DIR_ENDPOINT)?;
        Ok(Self {
            client,
            listing_url,
            documents: DocumentUrlBuilder::repository(raw_base)?,
        })
    }

    pub fn document_urls(&self) -> DocumentUrlBuilder {
        self.documents.clone()
    }

    pub fn listing_url(&self) -> &str {
        self.listing_url.as_str()
    }
}

impl StudyEnumerator for RepositoryListingSource {
    async fn list_studies(&self) -> Result<StudyList, DiscoveryError> {
        let entries: Vec<ListingEntry> = fetch_listing(&self.client, &self.listing_url).await?;
        tracing::info!(
            "Found {} study directories at {}",
            entries.len(),
            self.listing_url
        );
        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }
}
