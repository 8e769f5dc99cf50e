//! Output module for run summaries and reports
//!
//! This module handles:
//! - Accumulating per-study outcomes into a run summary
//! - Printing the end-of-run report
//! - Writing failed study ids for a targeted re-run

mod report;
mod summary;

pub use report::{print_summary, write_failed_ids, write_summary};
pub use summary::{RunSummary, SummaryRecorder};
