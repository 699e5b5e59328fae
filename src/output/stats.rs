//! Statistics generation from a catalog
//!
//! This module provides functionality for summarising a catalog and
//! displaying the summary.

use crate::storage::Catalog;
use std::collections::BTreeMap;

/// Catalog statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStatistics {
    /// Total number of catalogued problems
    pub total_problems: u64,

    /// Total number of setup commands across all problems
    pub total_commands: u64,

    /// Problems per course slug
    pub problems_by_course: BTreeMap<String, u64>,

    /// Problems per year
    pub problems_by_year: BTreeMap<u16, u64>,

    /// Problems per unit format (`psets`, `projects`, ...)
    pub problems_by_format: BTreeMap<String, u64>,

    /// Occurrences of each command verb (`wget`, `cd`, ...)
    pub command_verbs: BTreeMap<String, u64>,

    /// Keys that do not parse as problem endpoints
    pub malformed_keys: u64,
}

impl CatalogStatistics {
    /// Computes statistics for a catalog
    ///
    /// # Arguments
    ///
    /// * `catalog` - The catalog to summarise
    ///
    /// # Returns
    ///
    /// The per-course, per-year and per-command breakdowns
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self {
            total_problems: catalog.len() as u64,
            ..Self::default()
        };

        for (_, record) in catalog.iter() {
            stats.total_commands += record.commands.len() as u64;

            for command in &record.commands {
                if let Some(verb) = command.split_whitespace().next() {
                    *stats.command_verbs.entry(verb.to_string()).or_insert(0) += 1;
                }
            }
        }

        let mut parsed = 0;
        for (endpoint, _) in catalog.endpoints() {
            parsed += 1;
            *stats
                .problems_by_course
                .entry(endpoint.course_slug().to_string())
                .or_insert(0) += 1;
            if let Some(year) = endpoint.year() {
                *stats.problems_by_year.entry(year).or_insert(0) += 1;
            }
            if let Some(format) = endpoint.format() {
                *stats
                    .problems_by_format
                    .entry(format.to_string())
                    .or_insert(0) += 1;
            }
        }
        stats.malformed_keys = stats.total_problems - parsed;

        stats
    }

    /// Mean number of commands per problem
    pub fn average_commands(&self) -> f64 {
        if self.total_problems == 0 {
            0.0
        } else {
            self.total_commands as f64 / self.total_problems as f64
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CatalogStatistics) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    println!("  Problems catalogued: {}", stats.total_problems);
    println!("  Setup commands: {}", stats.total_commands);
    println!("  Commands per problem: {:.1}", stats.average_commands());
    println!();

    println!("Problems by Course:");
    for (course, count) in &stats.problems_by_course {
        println!("  {}: {}", course, count);
    }
    println!();

    println!("Problems by Year:");
    for (year, count) in stats.problems_by_year.iter().rev() {
        println!("  {}: {}", year, count);
    }
    println!();

    println!("Problems by Format:");
    for (format, count) in &stats.problems_by_format {
        println!("  {}: {}", format, count);
    }
    println!();

    if !stats.command_verbs.is_empty() {
        println!("Command Usage:");
        // Sort verbs by count (descending)
        let mut verbs: Vec<_> = stats.command_verbs.iter().collect();
        verbs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (verb, count) in verbs {
            println!("  {}: {}", verb, count);
        }
        println!();
    }

    if stats.malformed_keys > 0 {
        println!("Malformed keys: {}", stats.malformed_keys);
    }
}
