//! Value objects flowing through the difference pipeline.
//!
//! Wire-format field names follow the upstream service contracts: the
//! classifier's reply uses camelCase fields with the variant tag serialized
//! as `type`, so the same JSON shape works as the structured-output schema
//! and as the API response body.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One retrieved page considered as a potential counterpart for comparison.
///
/// Created per request by the retrieval gateway and discarded after the
/// pipeline run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    /// Bare document filename; any directory prefix is stripped by the gateway.
    pub filename: String,
    pub page: i32,
    /// Plain text of one page.
    pub content: String,
    /// Retrieval relevance, higher is more relevant.
    pub score: f64,
}

/// Classification of one finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DifferenceKind {
    Overlap,
    Contradiction,
}

/// One overlap or contradiction between two excerpts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    pub filename1: String,
    pub excerpt1: String,
    pub page_number1: i32,
    pub filename2: String,
    pub excerpt2: String,
    pub page_number2: i32,
    /// Required for contradictions, expected for overlaps.
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: DifferenceKind,
}

/// The classifier's full answer for one source passage.
///
/// When no valid finding exists all three fields are empty; content is never
/// fabricated to fill them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DiffReport {
    pub summary: String,
    pub overlaps: Vec<Difference>,
    pub contradictions: Vec<Difference>,
}

impl DiffReport {
    /// A report with no findings. Valid, and distinct from a failed run.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.overlaps.is_empty() && self.contradictions.is_empty()
    }
}
