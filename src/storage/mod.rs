//! Storage module for the problem catalog
//!
//! This module handles:
//! - The in-memory catalog of problems and their setup sequences
//! - Snapshotting the catalog to durable storage after each walk unit
//! - Reading a persisted catalog back for inspection

mod json;
mod traits;

pub use json::JsonCatalogStore;
pub use traits::{CatalogWriter, MemoryWriter, StorageError, StorageResult};

use crate::url::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The cleaned, ordered shell commands that set a problem up
///
/// Always a list, even when it holds a single command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandSequence(Vec<String>);

impl CommandSequence {
    pub fn new(commands: Vec<String>) -> Self {
        Self(commands)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for CommandSequence {
    fn from(commands: Vec<String>) -> Self {
        Self(commands)
    }
}

impl<'a> IntoIterator for &'a CommandSequence {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One catalogued problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// Relative path of the page the commands came from
    pub source: String,
    /// Setup sequence; never empty inside a catalog
    pub commands: CommandSequence,
}

/// Problems keyed by `course/year/format/index/problem`
///
/// Keys are kept sorted so identical catalogs serialise identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: BTreeMap<String, ProblemRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a problem's setup sequence
    ///
    /// Returns `false` (and stores nothing) for an empty sequence or for a
    /// key that is already catalogued; records are never replaced.
    pub fn insert(&mut self, endpoint: &Endpoint, commands: CommandSequence) -> bool {
        if commands.is_empty() {
            return false;
        }

        let key = endpoint.key();
        if self.records.contains_key(&key) {
            return false;
        }

        self.records.insert(
            key.clone(),
            ProblemRecord {
                source: key,
                commands,
            },
        );
        true
    }

    pub fn get(&self, key: &str) -> Option<&ProblemRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProblemRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates records whose key parses as a full endpoint
    pub fn endpoints(&self) -> impl Iterator<Item = (Endpoint, &ProblemRecord)> {
        self.records
            .iter()
            .filter_map(|(key, record)| Endpoint::parse_key(key).ok().map(|e| (e, record)))
    }

    /// Finds a problem by its sub-problem path (e.g. `mario/less`)
    ///
    /// With an explicit `year`, only that year matches. Without one, the
    /// most recent catalogued year is the default. Ties within a year go to
    /// the last key in sort order.
    pub fn resolve(&self, problem: &str, year: Option<u16>) -> Option<(Endpoint, &ProblemRecord)> {
        let problem = problem.trim_matches('/');

        self.endpoints()
            .filter(|(endpoint, _)| endpoint.problem() == Some(problem))
            .filter(|(endpoint, _)| year.is_none() || endpoint.year() == year)
            .max_by_key(|(endpoint, _)| endpoint.year())
    }

    /// Years catalogued for a problem, most recent first
    pub fn years_for(&self, problem: &str) -> Vec<u16> {
        let problem = problem.trim_matches('/');
        let mut years: Vec<u16> = self
            .endpoints()
            .filter(|(endpoint, _)| endpoint.problem() == Some(problem))
            .filter_map(|(endpoint, _)| endpoint.year())
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(course: &str, year: u16, index: u32, problem: &str) -> Endpoint {
        Endpoint::course(course)
            .with_year(year)
            .with_format("psets")
            .with_index(index)
            .with_problem(problem)
    }

    fn commands(list: &[&str]) -> CommandSequence {
        CommandSequence::new(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_insert_keeps_source_path() {
        let mut catalog = Catalog::new();
        assert!(catalog.insert(&endpoint("x", 2024, 1, "mario/less/"), commands(&["cd"])));

        let record = catalog.get("x/2024/psets/1/mario/less").unwrap();
        assert_eq!(record.source, "x/2024/psets/1/mario/less");
        assert_eq!(record.commands.as_slice(), ["cd"]);
    }

    #[test]
    fn test_empty_sequence_is_dropped() {
        let mut catalog = Catalog::new();
        assert!(!catalog.insert(&endpoint("x", 2024, 1, "hello"), CommandSequence::default()));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_records_are_not_replaced() {
        let mut catalog = Catalog::new();
        let e = endpoint("x", 2024, 1, "hello");
        assert!(catalog.insert(&e, commands(&["wget a"])));
        assert!(!catalog.insert(&e, commands(&["wget b"])));
        assert_eq!(catalog.get(&e.key()).unwrap().commands.as_slice(), ["wget a"]);
    }

    #[test]
    fn test_resolve_defaults_to_latest_year() {
        let mut catalog = Catalog::new();
        catalog.insert(&endpoint("x", 2023, 1, "cash"), commands(&["wget 2023"]));
        catalog.insert(&endpoint("x", 2025, 1, "cash"), commands(&["wget 2025"]));
        catalog.insert(&endpoint("x", 2024, 1, "cash"), commands(&["wget 2024"]));
        catalog.insert(&endpoint("x", 2026, 2, "credit"), commands(&["wget credit"]));

        let (found, record) = catalog.resolve("cash", None).unwrap();
        assert_eq!(found.year(), Some(2025));
        assert_eq!(record.commands.as_slice(), ["wget 2025"]);

        let (found, _) = catalog.resolve("cash/", Some(2023)).unwrap();
        assert_eq!(found.year(), Some(2023));

        assert!(catalog.resolve("cash", Some(2019)).is_none());
        assert!(catalog.resolve("mario", None).is_none());
        assert_eq!(catalog.years_for("cash"), vec![2025, 2024, 2023]);
    }

    #[test]
    fn test_serialises_as_plain_map() {
        let mut catalog = Catalog::new();
        catalog.insert(&endpoint("x", 2024, 0, "hello"), commands(&["wget u", "unzip u"]));

        let value = serde_json::to_value(&catalog).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "x/2024/psets/0/hello": {
                    "source": "x/2024/psets/0/hello",
                    "commands": ["wget u", "unzip u"]
                }
            })
        );
    }
}
