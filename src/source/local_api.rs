use crate::source::listing::fetch_listing;
use crate::source::{StudyEnumerator, StudyId, StudyList};
use crate::url::{join_endpoint, normalize_base_url, DocumentUrlBuilder};
use crate::{DiscoveryError, UrlError};
use reqwest::Client;
use url::Url;

/// Endpoint below the API base that lists every study id
const STUDY_LIST_ENDPOINT: &str = "study_list";

/// Study source backed by a phylesystem content API
///
/// `GET {api_base}study_list` returns a JSON array of id strings.
#[derive(Debug, Clone)]
pub struct LocalApiSource {
    client: Client,
    listing_url: Url,
    documents: DocumentUrlBuilder,
}

impl LocalApiSource {
    pub fn new(api_base: &str, client: Client) -> Result<Self, UrlError> {
        let api_base = normalize_base_url(api_base)?;
        let listing_url = join_endpoint(&api_base, STUDY_LIST_ENDPOINT)?;
        Ok(Self {
            client,
            listing_url,
            documents: DocumentUrlBuilder::Api { api_base },
        })
    }

    pub fn document_urls(&self) -> DocumentUrlBuilder {
        self.documents.clone()
    }

    pub fn listing_url(&self) -> &str {
        self.listing_url.as_str()
    }
}

impl StudyEnumerator for LocalApiSource {
    async fn list_studies(&self) -> Result<StudyList, DiscoveryError> {
        let studies: Vec<StudyId> = fetch_listing(&self.client, &self.listing_url).await?;
        tracing::info!(
            "Found {} studies at {}",
            studies.len(),
            self.listing_url
        );
        Ok(studies)
    }
}
