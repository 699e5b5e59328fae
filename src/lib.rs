//! Setup-Scout: a setup-command harvester for course documentation sites
//!
//! This crate walks a hierarchically organised documentation site
//! (course → year → format → index → sub-problem), probing URLs to discover
//! which branches exist, and extracts the shell commands each problem page
//! gives for fetching its starter files. The results are persisted as a
//! catalog keyed by problem path.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Setup-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to join '{path}' onto {base}: {source}")]
    Join {
        base: String,
        path: String,
        source: ::url::ParseError,
    },

    #[error("Malformed problem key: {0}")]
    MalformedKey(String),
}

/// Result type alias for Setup-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CommandCleaner, CommandExtractor, FetchOutcome, Fetcher, Walker};
pub use storage::{Catalog, CommandSequence, ProblemRecord};
pub use url::Endpoint;
