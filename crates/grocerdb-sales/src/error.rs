use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("sales file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sales document {}: {source}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize sales document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sale extraction failed: {0}")]
    Extraction(String),

    #[error("vendor folder not found: {}", dir.display())]
    VendorNotFound { dir: PathBuf },

    #[error("no images found in {}", dir.display())]
    NoImages { dir: PathBuf },
}
