use crate::source::StudyId;
use std::fmt;

/// Result of submitting one study to the indexing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexingOutcome {
    /// The request succeeded and the service reported no error for the URL
    Success { study_id: StudyId, url: String },

    /// The request failed or the service rejected the document
    Failure(IndexingFailure),
}

/// Details of a failed submission, with enough context to retry by hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingFailure {
    pub study_id: StudyId,

    /// The document URL that was submitted; empty when none could be built
    pub url: String,

    /// HTTP status of the indexing response, or 0 when no response arrived
    pub status: u16,

    /// Response body, service error message, or transport error
    pub message: String,
}

impl IndexingFailure {
    /// True when the request never got an HTTP response
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

impl fmt::Display for IndexingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() {
            write!(f, "study {}: {}", self.study_id, self.message)
        } else if self.is_transport() {
            write!(
                f,
                "study {} ({}): transport error: {}",
                self.study_id, self.url, self.message
            )
        } else {
            write!(
                f,
                "study {} ({}): HTTP {}: {}",
                self.study_id, self.url, self.status, self.message
            )
        }
    }
}
