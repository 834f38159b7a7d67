//! Route handlers.

pub mod documents;
pub mod health;
pub mod pipeline;
pub mod reader;

pub use documents::document_handler;
pub use health::health_handler;
pub use pipeline::pipeline_handler;
pub use reader::reader_handler;

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::error::PipelineError;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Map a pipeline error onto its HTTP representation.
///
/// Upstream-service failures are gateway errors; a missing page is 404.
/// The body carries the stage-specific message so the UI can show which
/// stage failed instead of a fabricated partial result.
pub fn error_response(err: PipelineError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        PipelineError::PageNotFound { .. } => StatusCode::NOT_FOUND,
        PipelineError::RetrievalUnavailable { .. }
        | PipelineError::ClassificationUnavailable { .. }
        | PipelineError::ClassificationParseError { .. } => StatusCode::BAD_GATEWAY,
        PipelineError::MissingConfiguration { .. } | PipelineError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}
