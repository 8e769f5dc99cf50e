//! Configuration module for the indexer
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default, so a run can be driven entirely from
//! the command line; values given on the command line override the file.
//!
//! # Example
//!
//! ```no_run
//! use oti_indexer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("indexer.toml")).unwrap();
//! println!("Index path: {}", config.indexer.index_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, IndexerConfig, RequestFormat, SourceConfig, UserAgentConfig, DEFAULT_API_URL,
    DEFAULT_INDEX_PATH,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_CONCURRENT_SUBMISSIONS};
