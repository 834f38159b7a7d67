//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::{OpenAIClient, PostgresPageStore, SearchIndexClient, ServerDeps};
use crate::server::routes::{document_handler, health_handler, pipeline_handler, reader_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: ServerDeps,
}

/// Build the Axum application router.
///
/// External-service clients are constructed once here and injected through
/// `ServerDeps`; handlers never reach for ambient globals.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let search_index = Arc::new(SearchIndexClient::new(
        config.search_endpoint.clone(),
        config.search_api_key.clone(),
    ));
    let completions = Arc::new(
        OpenAIClient::new(config.llm_api_key.clone()).with_base_url(config.llm_base_url.clone()),
    );
    let page_store = Arc::new(PostgresPageStore::new(pool.clone()));

    let deps = ServerDeps::new(pool.clone(), search_index, completions, page_store);

    let state = AppState { db_pool: pool, deps };

    // CORS open for the separately served web UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/pipeline", post(pipeline_handler))
        .route("/api/documents", get(document_handler))
        .route("/api/reader", post(reader_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
