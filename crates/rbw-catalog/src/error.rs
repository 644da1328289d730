use thiserror::Error;

/// Errors produced by catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No article is registered for this identifier. Not fatal: the caller
    /// keeps accepting scans.
    #[error("unknown RFID tag: {tag}")]
    TagNotFound { tag: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
