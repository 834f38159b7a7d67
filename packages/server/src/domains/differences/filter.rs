//! Candidate filtering between retrieval and classification.
//!
//! The index returns a broad pool; the classifier gets a bounded, ranked set
//! with the source document itself removed. Oversized pages are excluded
//! rather than truncated - a truncated page would produce misleading partial
//! excerpts downstream.

use crate::common::identity;

use super::models::Candidate;

/// Maximum candidates forwarded to the classifier.
pub const MAX_CANDIDATES: usize = 50;

/// Pages at or above this many characters (after trimming) are excluded.
pub const MAX_PAGE_CONTENT_CHARS: usize = 20_000;

/// Rank and cap the candidate set for one source document.
///
/// Empty output is valid and flows through to the classifier as
/// "no candidates".
pub fn filter_candidates(source_document: &str, candidates: Vec<Candidate>) -> Vec<Candidate> {
    let source = identity::base_identity(source_document);

    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| identity::base_identity(&c.filename) != source)
        .filter(|c| c.content.trim().chars().count() < MAX_PAGE_CONTENT_CHARS)
        .collect();

    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept.truncate(MAX_CANDIDATES);
    kept
}
