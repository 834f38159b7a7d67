//! Query condensation.
//!
//! Raw passages make poor retrieval queries; a fast completion call distills
//! the passage into its core topics before the index is consulted.

use crate::error::{PipelineError, Result};
use crate::kernel::{BaseCompletions, GEMINI_FLASH};

const CONDENSE_SYSTEM_PROMPT: &str =
    "You are an AI assistant that converts legal text paragraphs into concise vector search queries.";

/// Condense a source passage into a short retrieval query.
///
/// A failed condensation aborts the retrieval stage; there is no fallback to
/// querying with the raw passage.
pub async fn to_search_query(completions: &dyn BaseCompletions, passage: &str) -> Result<String> {
    let user = format!(
        "Convert the following legal text paragraph into a concise vector search query \
         that captures its main topics and concepts:\n\n\"{passage}\"\n\n\
         The query should be brief, focused, and suitable for retrieving relevant legal \
         documents. Do not include the name of the regulation or any metadata, only the \
         core content topics."
    );

    completions
        .complete(GEMINI_FLASH, CONDENSE_SYSTEM_PROMPT, &user)
        .await
        .map_err(|e| PipelineError::retrieval_unavailable(format!("query condensation failed: {e}")))
}
