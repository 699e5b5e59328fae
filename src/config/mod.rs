//! Configuration module for Setup-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a walk can also run from `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use setup_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Walking {} courses", config.site.courses.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractorConfig, FetcherConfig, OutputConfig, SiteConfig, DEFAULT_COMMAND_PREFIXES,
    DEFAULT_SECTION_HEADINGS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
