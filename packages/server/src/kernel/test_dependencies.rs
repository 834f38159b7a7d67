// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected as ServerDeps for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

use super::ai::{CompletionsError, CompletionsResult};
use super::deps::ServerDeps;
use super::traits::{BaseCompletions, BasePageStore, BaseSearchIndex, PageRecord};
use crate::common::identity;
use crate::domains::differences::Candidate;
use crate::error::{PipelineError, Result};

// =============================================================================
// Mock Search Index
// =============================================================================

pub struct MockSearchIndex {
    results: Arc<Mutex<Vec<Vec<Candidate>>>>,
    queries: Arc<Mutex<Vec<String>>>,
    unavailable: bool,
}

impl MockSearchIndex {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
            unavailable: false,
        }
    }

    /// Queue one result set to be returned.
    pub fn with_results(self, candidates: Vec<Candidate>) -> Self {
        self.results.lock().unwrap().push(candidates);
        self
    }

    /// Make every search fail with `RetrievalUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSearchIndex for MockSearchIndex {
    async fn search(&self, query: &str, _top: usize) -> Result<Vec<Candidate>> {
        self.queries.lock().unwrap().push(query.to_string());

        if self.unavailable {
            return Err(PipelineError::retrieval_unavailable(
                "mock index configured as unavailable",
            ));
        }

        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            Ok(vec![])
        } else {
            Ok(results.remove(0))
        }
    }
}

// =============================================================================
// Mock Completions
// =============================================================================

/// One recorded completion call.
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub model: String,
    pub system: String,
    pub user: String,
    pub structured: bool,
}

pub struct MockCompletions {
    responses: Arc<Mutex<Vec<CompletionsResult<String>>>>,
    calls: Arc<Mutex<Vec<CompletionCall>>>,
}

impl MockCompletions {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response. Responses are consumed in call order
    /// across both trait methods.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: CompletionsError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    /// Calls received, in order.
    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> CompletionsResult<String> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(String::new())
        } else {
            responses.remove(0)
        }
    }
}

impl Default for MockCompletions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCompletions for MockCompletions {
    async fn complete(&self, model: &str, system: &str, user: &str) -> CompletionsResult<String> {
        self.calls.lock().unwrap().push(CompletionCall {
            model: model.to_string(),
            system: system.to_string(),
            user: user.to_string(),
            structured: false,
        });
        self.next_response()
    }

    async fn complete_structured(
        &self,
        model: &str,
        system: &str,
        user: &str,
        _schema_name: &str,
        _schema: serde_json::Value,
    ) -> CompletionsResult<String> {
        self.calls.lock().unwrap().push(CompletionCall {
            model: model.to_string(),
            system: system.to_string(),
            user: user.to_string(),
            structured: true,
        });
        self.next_response()
    }
}

// =============================================================================
// Mock Page Store
// =============================================================================

pub struct MockPageStore {
    pages: Arc<Mutex<HashMap<(String, i32), String>>>,
}

impl MockPageStore {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_page(self, document: &str, page: i32, content: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((identity::base_identity(document), page), content.to_string());
        self
    }
}

impl Default for MockPageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePageStore for MockPageStore {
    async fn fetch_page(&self, document: &str, page: i32) -> Result<PageRecord> {
        let doc_identity = identity::base_identity(document);
        let pages = self.pages.lock().unwrap();

        match pages.get(&(doc_identity.clone(), page)) {
            Some(content) => Ok(PageRecord {
                id: format!("{}-{}", doc_identity, page),
                document: doc_identity.clone(),
                page,
                content: content.clone(),
                file_path: format!("corpus/{}", doc_identity),
            }),
            None => Err(PipelineError::PageNotFound {
                document: doc_identity,
                page,
            }),
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Assembles a `ServerDeps` from mocks, with a lazy pool that never connects.
pub struct TestDependencies {
    pub search_index: Arc<MockSearchIndex>,
    pub completions: Arc<MockCompletions>,
    pub page_store: Arc<MockPageStore>,
}

impl TestDependencies {
    pub fn new(
        search_index: MockSearchIndex,
        completions: MockCompletions,
        page_store: MockPageStore,
    ) -> Self {
        Self {
            search_index: Arc::new(search_index),
            completions: Arc::new(completions),
            page_store: Arc::new(page_store),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool construction cannot fail");

        ServerDeps::new(
            pool,
            self.search_index.clone(),
            self.completions.clone(),
            self.page_store.clone(),
        )
    }
}
