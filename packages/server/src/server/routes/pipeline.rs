use axum::{extract::Extension, response::IntoResponse, Json};
use serde::Deserialize;

use crate::domains::differences::DifferencePipeline;
use crate::server::app::AppState;

use super::error_response;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRequest {
    /// Source passage (or pre-built query text) selected by the reviewer.
    pub query: String,
    /// Source document reference; may carry a page locator suffix.
    pub document: String,
    pub source_page_number: i32,
}

/// Run the full difference pipeline for one source passage.
pub async fn pipeline_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<PipelineRequest>,
) -> impl IntoResponse {
    let pipeline = DifferencePipeline::new(state.deps.clone());

    match pipeline
        .run(&body.query, &body.document, body.source_page_number)
        .await
    {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            tracing::error!(error = %err, document = %body.document, "pipeline run failed");
            error_response(err).into_response()
        }
    }
}
