//! Indexing run coordinator
//!
//! This module drives a run:
//! - Enumerating the study list once
//! - Applying an optional study filter
//! - Submitting each study and collecting every outcome
//! - Producing the final run summary

use crate::config::Config;
use crate::http::build_http_client;
use crate::indexer::{OtiSubmitter, Submitter};
use crate::output::{RunSummary, SummaryRecorder};
use crate::source::{StudyEnumerator, StudyFilter, StudyId, StudySource};
use crate::{ConfigError, IndexerError, UrlError};
use futures::stream::{self, StreamExt};

/// Per-run options that are not part of the service configuration
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// In-flight submissions; 1 means strictly sequential
    pub max_concurrent_submissions: usize,

    /// Restrict the run to these studies
    pub filter: Option<StudyFilter>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_concurrent_submissions: 1,
            filter: None,
        }
    }
}

/// Main indexing coordinator
pub struct Coordinator<E, S> {
    enumerator: E,
    submitter: S,
    options: RunOptions,
}

impl Coordinator<StudySource, OtiSubmitter> {
    /// Builds a coordinator for the configured source and indexing service
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(IndexerError)` - The indexing service URL is missing, a URL is
    ///   invalid, or the HTTP client could not be built
    pub fn from_config(config: &Config, filter: Option<StudyFilter>) -> Result<Self, IndexerError> {
        let oti_url = config
            .indexer
            .url
            .as_deref()
            .ok_or(ConfigError::MissingIndexerUrl)?;

        let client = build_http_client(&config.user_agent, &config.indexer)?;
        let source = StudySource::from_config(&config.source, client.clone())?;
        let submitter = OtiSubmitter::new(
            client,
            oti_url,
            &config.indexer.index_path,
            source.document_urls(),
            config.indexer.request_format,
        )?;

        tracing::info!("Using the indexing endpoint at: {}", submitter.index_url());
        tracing::info!(
            "Using the studies from: {} ({} documents)",
            source.listing_url(),
            source.document_urls().mode_name()
        );

        Ok(Self::new(
            source,
            submitter,
            RunOptions {
                max_concurrent_submissions: config.indexer.max_concurrent_submissions,
                filter,
            },
        ))
    }
}

impl<E, S> Coordinator<E, S>
where
    E: StudyEnumerator,
    S: Submitter,
{
    pub fn new(enumerator: E, submitter: S, options: RunOptions) -> Self {
        Self {
            enumerator,
            submitter,
            options,
        }
    }

    /// Enumerates and filters the studies for this run
    ///
    /// Fails without a partial list if discovery fails.
    pub async fn studies(&self) -> Result<Vec<StudyId>, IndexerError> {
        let studies = self.enumerator.list_studies().await?;
        Ok(match &self.options.filter {
            Some(filter) => filter.apply(studies),
            None => studies,
        })
    }

    /// Lists each study with the document URL that would be submitted
    ///
    /// Ids with no valid document URL carry the error instead; a real run
    /// records them as failures.
    pub async fn plan(&self) -> Result<Vec<(StudyId, Result<String, UrlError>)>, IndexerError> {
        let studies = self.studies().await?;
        Ok(studies
            .into_iter()
            .map(|id| {
                let url = self.submitter.document_url(&id);
                (id, url)
            })
            .collect())
    }

    /// Runs the indexing loop
    ///
    /// Every listed study is submitted exactly once. Outcomes are consumed in
    /// study-list order even when several submissions are in flight, so the
    /// summary has a single writer.
    pub async fn run(&self) -> Result<RunSummary, IndexerError> {
        let studies = self.studies().await?;
        let total = studies.len();
        let concurrency = self.options.max_concurrent_submissions.max(1);

        tracing::info!(
            "Indexing {} studies ({} at a time)",
            total,
            concurrency
        );

        let mut recorder = SummaryRecorder::start(total);
        let start_time = std::time::Instant::now();

        let mut outcomes = stream::iter(studies.iter())
            .map(|study_id| self.submitter.submit_one(study_id))
            .buffered(concurrency);

        while let Some(outcome) = outcomes.next().await {
            recorder.record(outcome);

            let done = recorder.attempted();
            if done % 10 == 0 && done < total {
                let rate = done as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {}/{} studies submitted, {:.2} studies/sec",
                    done,
                    total,
                    rate
                );
            }
        }

        let summary = recorder.finish();
        tracing::info!(
            "Indexing run finished: {} succeeded, {} failed in {:?}",
            summary.succeeded(),
            summary.failed(),
            start_time.elapsed()
        );

        Ok(summary)
    }
}

/// Runs a complete indexing pass from configuration
///
/// # Example
///
/// ```no_run
/// use oti_indexer::config::load_config;
/// use oti_indexer::indexer::run_indexing;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("indexer.toml"))?;
/// let summary = run_indexing(&config, None).await?;
/// println!("{} of {} indexed", summary.succeeded(), summary.attempted());
/// # Ok(())
/// # }
/// ```
pub async fn run_indexing(
    config: &Config,
    filter: Option<StudyFilter>,
) -> Result<RunSummary, IndexerError> {
    Coordinator::from_config(config, filter)?.run().await
}
