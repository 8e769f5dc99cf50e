//! Indexing module
//!
//! This module contains the core indexing logic, including:
//! - Request and response wire types for the indexing service
//! - Per-study submission and outcome classification
//! - Overall run coordination

mod coordinator;
mod outcome;
mod request;
mod submitter;

pub use coordinator::{run_indexing, Coordinator, RunOptions};
pub use outcome::{IndexingFailure, IndexingOutcome};
pub use request::{IndexResponse, IndexingRequest};
pub use submitter::{OtiSubmitter, Submitter};
