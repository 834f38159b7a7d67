//! Server dependencies (using traits for testability)
//!
//! Central dependency container passed into the pipeline and route handlers.
//! All external services sit behind trait abstractions; clients are
//! constructed once per process in `build_app` and shared from there.

use std::sync::Arc;

use sqlx::PgPool;

use super::traits::{BaseCompletions, BasePageStore, BaseSearchIndex};

/// Dependencies accessible to domain logic.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Vector index client for candidate retrieval
    pub search_index: Arc<dyn BaseSearchIndex>,
    /// Completion client for query condensation and classification
    pub completions: Arc<dyn BaseCompletions>,
    /// Page content lookup
    pub page_store: Arc<dyn BasePageStore>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        search_index: Arc<dyn BaseSearchIndex>,
        completions: Arc<dyn BaseCompletions>,
        page_store: Arc<dyn BasePageStore>,
    ) -> Self {
        Self {
            db_pool,
            search_index,
            completions,
            page_store,
        }
    }
}
