//! Storefront error types.

use storefront_data::FetchError;
use thiserror::Error;

/// Errors surfaced by the catalog services.
///
/// `Clone` so a single in-flight load can hand the same outcome to every
/// waiting caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unreachable or answered with a non-2xx status.
    #[error("Network error: {0}")]
    Network(String),

    /// Category load failed.
    #[error("Failed to load categories: {0}")]
    Load(String),

    /// Single-item lookup matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl StoreError {
    /// Check if the error came from the backend connection.
    pub fn is_network(&self) -> bool {
        matches!(self, StoreError::Network(_) | StoreError::Load(_))
    }
}

impl From<FetchError> for StoreError {
    fn from(e: FetchError) -> Self {
        StoreError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Validation(e.to_string())
    }
}
