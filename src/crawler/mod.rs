//! Crawler module for walking the documentation tree
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry logic and a global concurrency gate
//! - Sub-problem link filtering
//! - Setup-command extraction and cleaning
//! - Overall walk coordination

mod cleaner;
mod extractor;
mod fetcher;
mod parser;
mod retry;
mod walker;

pub use cleaner::CommandCleaner;
pub use extractor::{section, CommandExtractor, RawCommand, Section};
pub use fetcher::{
    build_http_client, FetchError, FetchOutcome, Fetcher, HttpTransport, RawResponse, Transport,
    TransportError,
};
pub use parser::{extract_sub_links, is_followable, SubLink};
pub use retry::RetryPolicy;
pub use walker::{next_step, AdvanceResult, Level, Step, WalkReport, Walker};

use crate::config::Config;
use crate::storage::Catalog;
use crate::ScoutError;

/// Runs a complete walk
///
/// This is the main entry point for harvesting. It will:
/// 1. Build the HTTP client and fetcher
/// 2. Probe courses, years, formats and indices
/// 3. Scrape every sub-problem page it finds
/// 4. Checkpoint the catalog to `output.catalog-path`
///
/// # Arguments
///
/// * `config` - The walk configuration
///
/// # Returns
///
/// * `Ok((Catalog, WalkReport))` - Walk completed and the catalog was persisted
/// * `Err(ScoutError)` - A checkpoint could not be written
pub async fn crawl(config: &Config) -> Result<(Catalog, WalkReport), ScoutError> {
    let mut walker = Walker::from_config(config)?;
    let report = walker.run().await?;
    Ok((walker.into_catalog(), report))
}
