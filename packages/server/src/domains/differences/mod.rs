//! Difference retrieval and classification pipeline.
//!
//! One invocation turns a source passage into a retrieval query, ranks and
//! filters candidate pages from other documents, and asks the completion
//! service to classify each pairing as an overlap, a contradiction, or
//! nothing at all.

pub mod classify;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod query;

pub use filter::{filter_candidates, MAX_CANDIDATES, MAX_PAGE_CONTENT_CHARS};
pub use models::{Candidate, DiffReport, Difference, DifferenceKind};
pub use pipeline::{DifferencePipeline, SEARCH_RESULT_POOL};
