//! JSON file persistence for scraped sale records.
//!
//! The document on disk is either a single [`ProductSales`] object or an
//! array of them. [`SalesStore::load`] reports which shape it found so that
//! a save/load cycle is lossless; consumers that only need the records call
//! [`SalesDocument::into_records`].

use std::fs;
use std::path::{Path, PathBuf};

use grocerdb_core::ProductSales;
use serde::Serialize;

use crate::error::SalesError;

/// Contents of the sales file, in whichever shape it was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SalesDocument {
    Single(ProductSales),
    Many(Vec<ProductSales>),
}

impl SalesDocument {
    /// Records in file order; a single object becomes a one-element list.
    #[must_use]
    pub fn into_records(self) -> Vec<ProductSales> {
        match self {
            Self::Single(record) => vec![record],
            Self::Many(records) => records,
        }
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        match self {
            Self::Single(record) => record.item_count(),
            Self::Many(records) => records.iter().map(ProductSales::item_count).sum(),
        }
    }
}

impl From<ProductSales> for SalesDocument {
    fn from(record: ProductSales) -> Self {
        Self::Single(record)
    }
}

impl From<Vec<ProductSales>> for SalesDocument {
    fn from(records: Vec<ProductSales>) -> Self {
        Self::Many(records)
    }
}

/// Reads and writes the sales document at a fixed path.
#[derive(Debug, Clone)]
pub struct SalesStore {
    path: PathBuf,
}

impl SalesStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `document` as pretty-printed JSON, replacing any existing file
    /// and creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Io`] if the directory or file cannot be written,
    /// or [`SalesError::Serialize`] if serialization fails.
    pub fn save(&self, document: &SalesDocument) -> Result<(), SalesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SalesError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut json = serde_json::to_string_pretty(document).map_err(SalesError::Serialize)?;
        json.push('\n');
        fs::write(&self.path, json).map_err(|source| SalesError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            items = document.item_count(),
            "sales document saved"
        );
        Ok(())
    }

    /// Reads the sales document, keeping the shape found on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::NotFound`] if the file does not exist,
    /// [`SalesError::Io`] if it cannot be read, or [`SalesError::Validation`]
    /// if its contents do not match the record schema.
    pub fn load(&self) -> Result<SalesDocument, SalesError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SalesError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(SalesError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let invalid = |source| SalesError::Validation {
            path: self.path.clone(),
            source,
        };

        // Decide the shape first so schema errors point at the real problem
        // rather than "did not match any variant".
        let value: serde_json::Value = serde_json::from_str(&content).map_err(invalid)?;
        if value.is_array() {
            serde_json::from_value(value)
                .map(SalesDocument::Many)
                .map_err(invalid)
        } else {
            serde_json::from_value(value)
                .map(SalesDocument::Single)
                .map_err(invalid)
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
