//! Typed errors for the difference pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can
//! pattern-match on the failing stage. `anyhow` is reserved for the
//! server binary boundary.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur across the difference pipeline.
///
/// Every stage fails fast and propagates upward unchanged; no stage
/// substitutes a default result for a hard failure. An empty report is a
/// valid outcome, never an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Search index (or the query condensation that feeds it) unreachable
    /// or returned a non-success status.
    #[error("retrieval unavailable: {reason}")]
    RetrievalUnavailable { reason: String },

    /// Completion service failed while classifying differences.
    #[error("classification unavailable: {reason}")]
    ClassificationUnavailable { reason: String },

    /// The classifier replied with data that does not match the report schema.
    #[error("classification reply did not match schema: {reason}")]
    ClassificationParseError { reason: String },

    /// Requested page does not exist in the page store.
    #[error("page {page} not found in document {document}")]
    PageNotFound { document: String, page: i32 },

    /// A required environment variable is unset.
    #[error("missing configuration: {name} must be set")]
    MissingConfiguration { name: &'static str },

    /// Page store query or connection failure (distinct from not-found).
    #[error("page store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl PipelineError {
    pub fn retrieval_unavailable(reason: impl Into<String>) -> Self {
        Self::RetrievalUnavailable {
            reason: reason.into(),
        }
    }

    pub fn classification_unavailable(reason: impl Into<String>) -> Self {
        Self::ClassificationUnavailable {
            reason: reason.into(),
        }
    }

    pub fn classification_parse(reason: impl Into<String>) -> Self {
        Self::ClassificationParseError {
            reason: reason.into(),
        }
    }
}
