//! JSON catalog file
//!
//! Snapshots are written to a temporary file in the destination directory
//! and renamed over the target, so a crash leaves either the previous
//! snapshot or the new one, never a torn file.

use crate::storage::traits::{CatalogWriter, StorageError, StorageResult};
use crate::storage::Catalog;
use crate::url::Endpoint;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads and writes a catalog as a pretty-printed JSON object
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads a previously persisted catalog
    ///
    /// Every key must name a full problem endpoint and every record must
    /// carry at least one command.
    pub fn load(&self) -> StorageResult<Catalog> {
        let content = std::fs::read_to_string(&self.path)?;
        let catalog: Catalog = serde_json::from_str(&content)?;

        for (key, record) in catalog.iter() {
            if let Err(e) = Endpoint::parse_key(key) {
                return Err(StorageError::MalformedEntry {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
            if record.commands.is_empty() {
                return Err(StorageError::MalformedEntry {
                    key: key.to_string(),
                    message: "empty command list".to_string(),
                });
            }
        }

        Ok(catalog)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CatalogWriter for JsonCatalogStore {
    fn persist(&mut self, catalog: &Catalog) -> StorageResult<()> {
        let mut json = serde_json::to_string_pretty(catalog)?;
        json.push('\n');

        let mut temp_file = NamedTempFile::new_in(self.parent_dir())?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(&self.path)
            .map_err(|e| StorageError::Persist {
                path: self.path.display().to_string(),
                source: e.error,
            })?;

        tracing::debug!(
            "Wrote catalog snapshot with {} problems to {}",
            catalog.len(),
            self.path.display()
        );
        Ok(())
    }
}
