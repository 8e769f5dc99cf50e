//! Indexing request submission
//!
//! This module sends one indexing request per study and classifies the
//! response. It never returns an error: every problem becomes an
//! [`IndexingOutcome::Failure`] so the run can move on to the next study.

use crate::config::RequestFormat;
use crate::indexer::outcome::{IndexingFailure, IndexingOutcome};
use crate::indexer::request::{IndexResponse, IndexingRequest};
use crate::source::StudyId;
use crate::url::{join_endpoint, normalize_base_url, DocumentUrlBuilder};
use crate::UrlError;
use reqwest::{header, Client};
use std::future::Future;
use url::Url;

/// Anything that can submit one study for indexing
pub trait Submitter {
    /// Document URL that would be submitted for `study_id`
    fn document_url(&self, study_id: &StudyId) -> Result<String, UrlError>;

    /// Submits `study_id` exactly once and reports how it went
    fn submit_one(&self, study_id: &StudyId) -> impl Future<Output = IndexingOutcome> + Send;
}

/// Submits studies to an OTI indexing endpoint
#[derive(Debug, Clone)]
pub struct OtiSubmitter {
    client: Client,
    index_url: Url,
    documents: DocumentUrlBuilder,
    format: RequestFormat,
}

impl OtiSubmitter {
    /// Creates a submitter
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client (carries timeouts and user agent)
    /// * `oti_base` - Base URL of the OTI service; a trailing slash is optional
    /// * `index_path` - Indexing endpoint below `oti_base`
    /// * `documents` - How study ids become document URLs for this run
    /// * `format` - Request body shape
    pub fn new(
        client: Client,
        oti_base: &str,
        index_path: &str,
        documents: DocumentUrlBuilder,
        format: RequestFormat,
    ) -> Result<Self, UrlError> {
        let oti_base = normalize_base_url(oti_base)?;
        let index_url = join_endpoint(&oti_base, index_path)?;
        Ok(Self {
            client,
            index_url,
            documents,
            format,
        })
    }

    pub fn index_url(&self) -> &str {
        self.index_url.as_str()
    }

    /// Posts one request and classifies the response
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | 2xx, no error entries | Success |
    /// | 2xx, any error entry | Failure with HTTP status and message |
    /// | non-2xx | Failure with HTTP status and response body |
    /// | no response / unreadable body | Failure with status 0 |
    async fn post(&self, study_id: &StudyId, url: String) -> IndexingOutcome {
        let request = IndexingRequest::single(url.clone());
        let failure = |status: u16, message: String| {
            IndexingOutcome::Failure(IndexingFailure {
                study_id: study_id.clone(),
                url: url.clone(),
                status,
                message,
            })
        };

        let response = match self
            .client
            .post(self.index_url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request.to_body(self.format))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return failure(0, describe_transport_error(&e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return failure(0, format!("unreadable response: {}", e)),
        };

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("empty response body")
                    .to_string()
            } else {
                body
            };
            return failure(status.as_u16(), message);
        }

        let decoded = IndexResponse::from_body(&body, &url);
        match decoded.error_for(&url) {
            Some(message) => failure(status.as_u16(), message),
            None => {
                if !decoded.indexed.is_empty() {
                    tracing::debug!("Service indexed: {}", decoded.indexed.join(", "));
                }
                IndexingOutcome::Success {
                    study_id: study_id.clone(),
                    url: url.clone(),
                }
            }
        }
    }
}

impl Submitter for OtiSubmitter {
    fn document_url(&self, study_id: &StudyId) -> Result<String, UrlError> {
        self.documents.document_url(study_id.as_str())
    }

    async fn submit_one(&self, study_id: &StudyId) -> IndexingOutcome {
        let outcome = match self.document_url(study_id) {
            Ok(url) => {
                tracing::info!("Indexing study {} from {}", study_id, url);
                self.post(study_id, url).await
            }
            // Nothing is sent for an id that has no valid document URL
            Err(e) => IndexingOutcome::Failure(IndexingFailure {
                study_id: study_id.clone(),
                url: String::new(),
                status: 0,
                message: e.to_string(),
            }),
        };

        match &outcome {
            IndexingOutcome::Success { study_id, .. } => {
                tracing::debug!("Indexed study {}", study_id);
            }
            IndexingOutcome::Failure(failure) => {
                tracing::error!("Indexing failed for {}", failure);
            }
        }
        outcome
    }
}

/// Classifies a request error for the failure message
fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
