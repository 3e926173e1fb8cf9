//! Errors surfaced while building the region catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal dataset problems; everything finer-grained is logged and skipped.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not a valid feature collection: {0}")]
    Parse(#[from] serde_json::Error),
}
