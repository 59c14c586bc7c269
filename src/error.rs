//! Error types for the indexing and retrieval pipeline.
//!
//! Per-file read failures are not represented here: the indexer recovers
//! from them locally and reports them as [`crate::models::SkippedFile`]
//! diagnostics instead of propagating an error.

use std::path::PathBuf;

/// Errors that can occur while building or querying the corpus.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Indexing was requested against a missing or non-directory path.
    /// Surfaced to API callers as a client error, never retried.
    #[error("invalid path: {} does not exist or is not a directory", .0.display())]
    InvalidPath(PathBuf),

    /// A vector's dimensionality does not match the index.
    #[error("dimension mismatch: index holds {expected}-dim vectors, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The embedding backend failed; the previously published corpus is
    /// left untouched.
    #[error("embedding failed: {0}")]
    Embedding(anyhow::Error),

    /// An include/exclude glob in the indexing configuration is invalid.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
}

/// Result type alias using [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;
