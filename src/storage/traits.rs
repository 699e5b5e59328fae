//! Storage traits and error types
//!
//! This module defines the trait interface for catalog writers and the
//! associated error type.

use crate::storage::Catalog;
use thiserror::Error;

/// Errors that can occur while persisting or loading a catalog
///
/// Unlike fetch failures these are fatal to a walk: losing the accumulated
/// catalog silently is worse than stopping.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed catalog entry '{key}': {message}")]
    MalformedEntry { key: String, message: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for catalog snapshots
///
/// Each call replaces the previous snapshot wholesale with the full current
/// catalog; there is no incremental append.
pub trait CatalogWriter {
    fn persist(&mut self, catalog: &Catalog) -> StorageResult<()>;
}

/// Keeps every snapshot in memory; useful when the caller wants the catalog
/// without touching disk
#[derive(Debug, Default)]
pub struct MemoryWriter {
    snapshots: Vec<Catalog>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots written so far, oldest first
    pub fn snapshots(&self) -> &[Catalog] {
        &self.snapshots
    }
}

impl CatalogWriter for MemoryWriter {
    fn persist(&mut self, catalog: &Catalog) -> StorageResult<()> {
        self.snapshots.push(catalog.clone());
        Ok(())
    }
}

impl<W: CatalogWriter + ?Sized> CatalogWriter for &mut W {
    fn persist(&mut self, catalog: &Catalog) -> StorageResult<()> {
        (**self).persist(catalog)
    }
}
