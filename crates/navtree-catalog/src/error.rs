//! Error types for catalog loading.

use std::path::PathBuf;

use thiserror::Error;

use navtree_core::{NavError, NodeKey};

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while reading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported catalog format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Two entries claim the same key.
    #[error("Duplicate catalog key: {key}")]
    DuplicateKey { key: NodeKey },

    /// An entry violates a model constraint (e.g. a blank title).
    #[error(transparent)]
    Model(#[from] NavError),
}
