//! Error types for the productos API.

use thiserror::Error;

/// Failures at the repository boundary.
///
/// `NotFound` is kept distinct from every other database failure so handlers
/// can map it to 404 while everything else becomes a generic 500. Startup
/// failures (config, listener) surface through `anyhow` at the binary edge.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Zero rows matched an identifier-qualified operation.
    #[error("no row matched the requested id")]
    NotFound,

    /// Any other database failure (connectivity, constraint, malformed query).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Whether this is the distinguished not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound)
    }
}
