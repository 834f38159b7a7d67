//! Difference classification.
//!
//! One schema-constrained completion call per pipeline run: the rule
//! preamble, the source excerpt with its locator, and the serialized
//! candidate set go out; a `DiffReport` comes back. The preamble IS the
//! decision policy: any wording change here changes what counts as a
//! finding.

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::kernel::{strict_schema_for, BaseCompletions, CompletionsError, GEMINI_PRO};

use super::models::{Candidate, DiffReport};

const SCHEMA_NAME: &str = "LegalDiffResponse";

const RULES_PROMPT: &str = r#"
You compare legal, regulatory, or compliance text segments. Your task is to identify ONLY two categories of findings:
(1) true overlaps (divergent rules governing the SAME regulatory subject), or
(2) true contradictions (rules that cannot both be complied with for the SAME regulatory subject).


STRICT DEFINITIONS:

1. SAME REGULATORY SUBJECT (mandatory condition)
   Two excerpts regulate the same subject ONLY IF ALL of the following are true:
   - They impose, modify, limit, or define obligations, rights, thresholds, conditions, prohibitions, exemptions, or procedures
   - They apply to the SAME actor type (for example investment firms, trading venues, APAs, ARMs, CCPs, CSDs, etc.)
   - They address the SAME regulatory action or requirement (for example order transparency, position limits, CCP access, commodity derivative exemption conditions, reporting obligations, trading venue functioning, etc.)
   - They operate within the SAME functional context (for example pre-trade transparency, clearing obligation, data reporting, position reporting, trading venue operation, best execution, etc.)

   If ANY of these criteria is not met, you must treat the excerpts as regulating DIFFERENT subjects.

   DO NOT classify texts as overlapping merely because:
   - they are both in EU financial regulation,
   - they both concern transparency in general,
   - they both concern derivatives in general,
   - they both mention reporting,
   - they both concern trading venues,
   - they both relate to MiFID II or MiFIR,
   - they are part of the same regulatory package,
   - they share conceptual themes.

   Only rule-level, actor-specific, requirement-specific alignment counts.

2. OVERLAP
   An overlap exists when:
   - Both excerpts meet the SAME REGULATORY SUBJECT test above, AND
   - They impose definitions, procedures, conditions, timelines, thresholds, exemptions, responsibilities, or scopes, AND
   - These rules or limits same or almost the same.

3. CONTRADICTION
   A contradiction exists ONLY when:
   - Both excerpts meet the SAME REGULATORY SUBJECT test above, AND
   - The limits or rules are not the same, for example: they are mutually exclusive OR they are different but can both be complied with, AND
   - One text prescribes a fixed numerical threshold, limit, or maximum for the same regulatory action while the other grants discretionary power to the actor to define that threshold, and the prescribed fixed limit falls within the domain that the discretionary rule leaves open. In such cases the fixed numerical requirement must be treated as contradicting the discretionary formulation.

4. EXCLUDED CONTENT (never produces overlaps or contradictions)
   - Recitals or purpose statements unless BOTH excerpts impose concrete, actor-specific legal effects.
   - Do not consider table of contents, section headings, or titles.
   - Do not consider dates or version numbers.
   - Broad policy descriptions.
   - Legislative rationale (why the EU chose a Regulation or a Directive).
   - Statements about general harmonisation goals.
   - High-level descriptions of transparency.
   - References to market functioning in general.
   - Any text that does not impose specific operative requirements.

5. OUTPUT RULES
   - If no valid overlaps or contradictions are found under the strict definitions above, you MUST return:
       "summary": "",
       "overlaps": [],
       "contradictions": []
   - You MUST NOT fabricate overlaps based on thematic similarity.
   - You MUST NOT compare unrelated requirements.
   - You MUST NOT infer shared subjects beyond explicit textual evidence.

6. WHEN A FINDING IS VALID
   For each valid overlap or contradiction, quote the exact operative wording causing the divergence or conflict.

7. NEVER provide findings for unrelated subjects.
   When in doubt about whether texts govern the same subject, default to treating them as DIFFERENT subjects and return no findings.

Your sole function is to detect ONLY rule-level divergences or conflicts on the EXACT SAME regulatory subject. All other comparisons, thematic links, or conceptual similarities must be ignored.
Tell the source and target document filenames as filename1 and filename2 in your response.
"#;

fn build_user_payload(
    source_excerpt: &str,
    source_document: &str,
    source_page: i32,
    candidates: &[Candidate],
) -> String {
    let related = serde_json::json!({
        "count": candidates.len(),
        "value": candidates,
    });

    format!(
        "Original content to be compared (filename {source_document}): {source_excerpt} \
         (page {source_page}) \n\nRelated content:\n{related}"
    )
}

/// Classify the source excerpt against the filtered candidate set.
///
/// No retries; the caller decides whether to re-issue a failed run.
pub async fn find_differences(
    completions: &dyn BaseCompletions,
    source_excerpt: &str,
    source_document: &str,
    source_page: i32,
    candidates: &[Candidate],
) -> Result<DiffReport> {
    let schema = strict_schema_for::<DiffReport>();
    let user = build_user_payload(source_excerpt, source_document, source_page, candidates);

    debug!(
        candidate_count = candidates.len(),
        payload_length = user.len(),
        "sending classification request"
    );

    let reply = completions
        .complete_structured(GEMINI_PRO, RULES_PROMPT, &user, SCHEMA_NAME, schema)
        .await
        .map_err(|e| match e {
            CompletionsError::Parse(reason) => PipelineError::classification_parse(reason),
            other => PipelineError::classification_unavailable(other.to_string()),
        })?;

    serde_json::from_str(&reply)
        .map_err(|e| PipelineError::classification_parse(format!("invalid report JSON: {e}")))
}
