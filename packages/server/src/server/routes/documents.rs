use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::kernel::BasePageStore;
use crate::server::app::AppState;

use super::error_response;

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub doc: String,
    pub page: i32,
}

/// Fetch the literal text of one document page.
pub async fn document_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<DocumentQuery>,
) -> impl IntoResponse {
    match state.deps.page_store.fetch_page(&params.doc, params.page).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, doc = %params.doc, page = params.page, "page lookup failed");
            error_response(err).into_response()
        }
    }
}
