//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod page_store;
pub mod schema;
pub mod search_client;
pub mod test_dependencies;
pub mod traits;

/// Gemini 2.5 Flash - fast model used to condense passages into search queries.
pub const GEMINI_FLASH: &str = "gemini-2.5-flash";

/// Gemini 2.5 Pro - frontier model used for difference classification.
pub const GEMINI_PRO: &str = "gemini-2.5-pro";

pub use ai::{CompletionsError, CompletionsResult, Message, OpenAIClient, StructuredRequest};
pub use deps::ServerDeps;
pub use page_store::PostgresPageStore;
pub use schema::strict_schema_for;
pub use search_client::SearchIndexClient;
pub use test_dependencies::{MockCompletions, MockPageStore, MockSearchIndex, TestDependencies};
pub use traits::*;
