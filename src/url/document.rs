use crate::url::normalize::normalize_base_url;
use crate::UrlError;
use url::Url;

/// Strategy for turning a study id into the URL of its NexSON document
///
/// Exactly one strategy is active for a run. The indexing service fetches the
/// document itself; the indexer only ever passes the URL along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentUrlBuilder {
    /// `{api_base}study/{id}.json`
    Api { api_base: Url },

    /// `{raw_base}/study/{id}/{id}.json`
    Repository { raw_base: Url },
}

impl DocumentUrlBuilder {
    /// Builds an API-mode strategy from an un-normalized base URL
    pub fn api(api_base: &str) -> Result<Self, UrlError> {
        Ok(Self::Api {
            api_base: normalize_base_url(api_base)?,
        })
    }

    /// Builds a repository-mode strategy from an un-normalized base URL
    pub fn repository(raw_base: &str) -> Result<Self, UrlError> {
        Ok(Self::Repository {
            raw_base: normalize_base_url(raw_base)?,
        })
    }

    /// Returns the document URL for a study
    ///
    /// The id is used as a single path segment and percent-encoded where
    /// needed. Ids that cannot stand as one segment (empty, `.` or `..`) are
    /// rejected, since the URL would otherwise point somewhere else.
    ///
    /// # Examples
    ///
    /// ```
    /// use oti_indexer::url::DocumentUrlBuilder;
    ///
    /// let api = DocumentUrlBuilder::api("http://x/").unwrap();
    /// assert_eq!(api.document_url("pg_41").unwrap(), "http://x/study/pg_41.json");
    ///
    /// let repo = DocumentUrlBuilder::repository("http://y").unwrap();
    /// assert_eq!(repo.document_url("10").unwrap(), "http://y/study/10/10.json");
    /// ```
    pub fn document_url(&self, study_id: &str) -> Result<String, UrlError> {
        if matches!(study_id.trim(), "" | "." | "..") {
            return Err(UrlError::InvalidStudyId(study_id.to_string()));
        }

        let file_name = format!("{study_id}.json");
        let (base, segments) = match self {
            Self::Api { api_base } => (api_base, vec!["study", file_name.as_str()]),
            Self::Repository { raw_base } => {
                (raw_base, vec!["study", study_id, file_name.as_str()])
            }
        };

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| UrlError::CannotBeABase(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    /// Short label for log lines
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Api { .. } => "api",
            Self::Repository { .. } => "repository",
        }
    }
}
