//! Error types for the catalog

use thiserror::Error;

/// Catalog error type
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A filter or enum value that does not parse
    #[error("invalid {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    /// Two records share an identifier
    #[error("duplicate pet id: {0}")]
    DuplicateId(u32),

    /// Identifiers start at 1
    #[error("pet id must be a positive integer")]
    ZeroId,

    /// Malformed catalog JSON
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue { field, value: value.into() }
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
