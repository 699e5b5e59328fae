//! Output module for presenting a harvested catalog
//!
//! This module handles:
//! - Summarising a catalog into per-course and per-year statistics
//! - Rendering a single problem's setup sequence for `--show`

pub mod stats;

pub use stats::{print_statistics, CatalogStatistics};

use crate::storage::ProblemRecord;
use crate::url::Endpoint;

/// Formats one problem's setup sequence, one command per line
///
/// # Arguments
///
/// * `endpoint` - Where the record came from
/// * `record` - The catalogued record
///
/// # Returns
///
/// A header line naming the source followed by the commands
pub fn format_record(endpoint: &Endpoint, record: &ProblemRecord) -> String {
    let mut out = format!("# {}\n", endpoint);
    for command in &record.commands {
        out.push_str(command);
        out.push('\n');
    }
    out
}
