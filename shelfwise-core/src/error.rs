//! Error types for Shelfwise Core

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Top-level error type for all Shelfwise operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Not authenticated: no active user session")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ShelfError {
    /// Whether the persistence layer could not be reached
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, ShelfError::Storage(StorageError::Unavailable(_)))
    }
}

/// Errors from parsing user or catalog input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid page number: {0:?}")]
    InvalidPage(String),

    #[error("Invalid total page count: {0:?}")]
    InvalidTotal(String),

    #[error("Invalid book key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid user id: {0:?}")]
    InvalidUser(String),

    #[error("Unknown collection: {0:?}")]
    UnknownCollection(String),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Corrupt document at {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Errors from the external catalog and bestseller services
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Request(err.to_string())
        }
    }
}
