//! URL handling module for the indexer
//!
//! This module provides base URL normalization, endpoint resolution, and the
//! document URL strategies used to point the indexing service at a study.

mod document;
mod normalize;

pub use document::DocumentUrlBuilder;
pub use normalize::{join_endpoint, normalize_base_url};
