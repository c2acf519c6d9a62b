//! Catalog errors - the three recoverable kinds callers pattern-match on
//!
//! Anything else coming out of a store is a `Storage` failure: the services
//! roll back the ambient transaction and propagate it unchanged.

use thiserror::Error;

/// Errors produced by the catalog services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A cuisine id lookup missed, or a cuisine name resolved to zero or
    /// more than one row (including an absent cuisine reference).
    #[error("cuisine not found")]
    CuisineNotFound,

    /// A lunch spot id lookup missed.
    #[error("lunch spot not found")]
    LunchSpotNotFound,

    /// A rename would collide case-insensitively with an existing cuisine name.
    #[error("cuisine name already in use: {name}")]
    CuisineNameConflict { name: String },

    /// Unexpected store failure. Not retried by this layer.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Catalog result type
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Both not-found kinds map to the same caller behavior (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::CuisineNotFound | CatalogError::LunchSpotNotFound
        )
    }

    /// Conflict kind maps to HTTP 409 at the caller.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::CuisineNameConflict { .. })
    }

    /// Build a storage failure from any displayable source error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(CatalogError::CuisineNotFound.is_not_found());
        assert!(CatalogError::LunchSpotNotFound.is_not_found());
        assert!(!CatalogError::CuisineNotFound.is_conflict());
    }

    #[test]
    fn test_conflict_classification() {
        let err = CatalogError::CuisineNameConflict {
            name: "Thai".to_string(),
        };
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("Thai"));
    }

    #[test]
    fn test_storage_failure_keeps_source_message() {
        let err = CatalogError::storage("disk full");
        assert_eq!(err, CatalogError::Storage("disk full".to_string()));
        assert!(!err.is_not_found());
        assert!(!err.is_conflict());
    }
}
