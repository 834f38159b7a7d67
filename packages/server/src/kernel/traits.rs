// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Domain functions
// take them by reference so every external service can be mocked in tests.
//
// Naming convention: Base* for trait names (e.g., BaseSearchIndex)

use async_trait::async_trait;
use serde::Serialize;

use crate::domains::differences::Candidate;
use crate::error::Result;
use crate::kernel::ai::CompletionsResult;

// =============================================================================
// Search Index Trait (Infrastructure - vector retrieval)
// =============================================================================

#[async_trait]
pub trait BaseSearchIndex: Send + Sync {
    /// Free-text query against the vector index.
    ///
    /// Returns normalized hits (bare filenames, sorted by descending score),
    /// at most `top` of them. One attempt per request; a failed call surfaces
    /// as `RetrievalUnavailable` and is not retried here.
    async fn search(&self, query: &str, top: usize) -> Result<Vec<Candidate>>;
}

// =============================================================================
// Completions Trait (Infrastructure - generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseCompletions: Send + Sync {
    /// Complete a system + user prompt pair with an LLM (raw text response).
    async fn complete(&self, model: &str, system: &str, user: &str) -> CompletionsResult<String>;

    /// Complete with a strict JSON schema constraining the reply.
    ///
    /// Returns the raw JSON string; callers deserialize into their own types
    /// and own the parse-failure mapping.
    async fn complete_structured(
        &self,
        model: &str,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> CompletionsResult<String>;
}

// =============================================================================
// Page Store Trait (Infrastructure - page content lookup)
// =============================================================================

/// The literal text of one stored page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: String,
    pub document: String,
    pub page: i32,
    pub content: String,
    pub file_path: String,
}

#[async_trait]
pub trait BasePageStore: Send + Sync {
    /// Fetch one page of a document.
    ///
    /// The identifier may carry a `_page_<n>` locator suffix; implementations
    /// strip it before lookup. A missing row is `PageNotFound`.
    async fn fetch_page(&self, document: &str, page: i32) -> Result<PageRecord>;
}
