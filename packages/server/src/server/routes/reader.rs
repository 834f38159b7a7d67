use axum::{extract::Extension, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::domains::differences::Difference;
use crate::domains::reader::{page_highlights, render_highlighted};
use crate::kernel::BasePageStore;
use crate::server::app::AppState;

use super::error_response;

#[derive(Debug, Deserialize)]
pub struct ReaderRequest {
    /// Document reference for the page being read (side 1 of the findings).
    pub document: String,
    pub page: i32,
    /// Findings previously produced by the pipeline for this document.
    pub differences: Vec<Difference>,
}

#[derive(Debug, Serialize)]
pub struct ReaderResponse {
    pub page: i32,
    /// Page content with located excerpts wrapped in keyed highlight spans.
    pub html: String,
}

/// Render one page with its difference excerpts highlighted.
///
/// Excerpts that fail to relocate are silently absent from the markup;
/// the UI correlates the surviving `data-diff-key` spans with result cards.
pub async fn reader_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<ReaderRequest>,
) -> impl IntoResponse {
    let record = match state.deps.page_store.fetch_page(&body.document, body.page).await {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!(error = %err, doc = %body.document, page = body.page, "page lookup failed");
            return error_response(err).into_response();
        }
    };

    let highlights = page_highlights(&body.differences, body.page);
    let html = render_highlighted(&record.content, &highlights);

    Json(ReaderResponse {
        page: record.page,
        html,
    })
    .into_response()
}
