//! Run summary accumulation
//!
//! A [`SummaryRecorder`] is created when submission starts and receives every
//! outcome; [`SummaryRecorder::finish`] turns it into a read-only
//! [`RunSummary`].

use crate::indexer::{IndexingFailure, IndexingOutcome};
use chrono::{DateTime, Utc};

/// Accumulates outcomes during a run
#[derive(Debug)]
pub struct SummaryRecorder {
    started_at: DateTime<Utc>,
    expected: usize,
    attempted: usize,
    succeeded: usize,
    failures: Vec<IndexingFailure>,
}

impl SummaryRecorder {
    /// Starts a run that expects `expected` outcomes
    pub fn start(expected: usize) -> Self {
        Self {
            started_at: Utc::now(),
            expected,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    /// Records one outcome
    pub fn record(&mut self, outcome: IndexingOutcome) {
        self.attempted += 1;
        match outcome {
            IndexingOutcome::Success { .. } => self.succeeded += 1,
            IndexingOutcome::Failure(failure) => self.failures.push(failure),
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Stamps the finish time and freezes the summary
    pub fn finish(self) -> RunSummary {
        if self.attempted != self.expected {
            tracing::warn!(
                "Run recorded {} outcomes but {} studies were scheduled",
                self.attempted,
                self.expected
            );
        }

        RunSummary {
            started_at: self.started_at,
            finished_at: Utc::now(),
            attempted: self.attempted,
            succeeded: self.succeeded,
            failures: self.failures,
        }
    }
}

/// Final, read-only record of one indexing run
#[derive(Debug, Clone)]
pub struct RunSummary {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    attempted: usize,
    succeeded: usize,
    failures: Vec<IndexingFailure>,
}

impl RunSummary {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Wall-clock duration of the submission phase
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failures in the order the studies were processed
    pub fn failures(&self) -> &[IndexingFailure] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
