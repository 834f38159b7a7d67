//! Pipeline orchestrator.
//!
//! One run is a sequential chain: condense the passage into a query, search
//! the index, filter the candidate pool, classify. The first failing stage
//! aborts the run and its error propagates unchanged - no partial results
//! are synthesized.

use tracing::info;

use crate::error::Result;
use crate::kernel::{BaseSearchIndex, ServerDeps};

use super::classify::find_differences;
use super::filter::filter_candidates;
use super::models::DiffReport;
use super::query::to_search_query;

/// Result pool requested from the index before filtering.
pub const SEARCH_RESULT_POOL: usize = 150;

/// Difference pipeline over injected service clients.
///
/// Invocations share no mutable state; one pipeline value can serve
/// concurrent requests.
pub struct DifferencePipeline {
    deps: ServerDeps,
}

impl DifferencePipeline {
    pub fn new(deps: ServerDeps) -> Self {
        Self { deps }
    }

    /// Run the full pipeline for one source passage.
    pub async fn run(
        &self,
        source_excerpt: &str,
        source_document: &str,
        source_page: i32,
    ) -> Result<DiffReport> {
        let query = to_search_query(self.deps.completions.as_ref(), source_excerpt).await?;
        info!(query = %query, "vector query generated");

        let hits = self
            .deps
            .search_index
            .search(&query, SEARCH_RESULT_POOL)
            .await?;
        info!(hit_count = hits.len(), "vector search completed");

        let candidates = filter_candidates(source_document, hits);
        info!(candidate_count = candidates.len(), "candidate filtering completed");

        find_differences(
            self.deps.completions.as_ref(),
            source_excerpt,
            source_document,
            source_page,
            &candidates,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::kernel::{
        CompletionsError, MockCompletions, MockPageStore, MockSearchIndex, TestDependencies,
    };

    use crate::domains::differences::models::Candidate;

    fn candidate(filename: &str, page: i32, content: &str, score: f64) -> Candidate {
        Candidate {
            id: format!("{filename}-{page}"),
            filename: filename.to_string(),
            page,
            content: content.to_string(),
            score,
        }
    }

    fn pipeline(search_index: MockSearchIndex, completions: MockCompletions) -> (DifferencePipeline, TestDependencies) {
        let deps = TestDependencies::new(search_index, completions, MockPageStore::new());
        (DifferencePipeline::new(deps.server_deps()), deps)
    }

    #[tokio::test]
    async fn test_overlapping_wording_yields_one_overlap() {
        // Source: EBA-GL-2017-06 p.44 on collateral valuation standards;
        // candidate: FIVA 4/2018 p.207 with overlapping wording.
        let search_index = MockSearchIndex::new().with_results(vec![candidate(
            "FIVA 4-2018.di_page_207",
            207,
            "Supervised entities must ensure that the valuation of acceptable collateral \
             is based on reliable appraisal methods, taking internationally recognised \
             valuation standards into account.",
            2.4,
        )]);
        let completions = MockCompletions::new()
            .with_response("collateral valuation standards")
            .with_response(
                r#"{"summary":"Both texts require internationally recognised valuation standards.",
                "overlaps":[{
                    "filename1":"EBA-GL-2017-06.di","excerpt1":"valuation of immovable property collateral","pageNumber1":44,
                    "filename2":"FIVA 4-2018.di","excerpt2":"valuation of acceptable collateral","pageNumber2":207,
                    "explanation":"Both impose the same valuation-standards requirement on collateral appraisal.",
                    "type":"OVERLAP"
                }],"contradictions":[]}"#,
            );

        let (pipeline, deps) = pipeline(search_index, completions);
        let report = pipeline
            .run(
                "Institutions should ensure that the property collateral is valued in \
                 accordance with applicable international standards",
                "EBA-GL-2017-06.di_page_44",
                44,
            )
            .await
            .unwrap();

        assert_eq!(report.overlaps.len(), 1);
        assert!(report.contradictions.is_empty());
        assert!(!report.overlaps[0].explanation.is_empty());

        // The index received the condensed query, not the raw passage.
        assert_eq!(deps.search_index.queries(), vec!["collateral valuation standards"]);
        // The classification payload carried the candidate content.
        let calls = deps.completions.calls();
        assert!(calls[1].structured);
        assert!(calls[1].user.contains("reliable appraisal methods"));
    }

    #[tokio::test]
    async fn test_fixed_rotation_count_vs_discretion_is_a_contradiction() {
        let search_index = MockSearchIndex::new().with_results(vec![candidate(
            "EBA-GL-2018-06.di_page_196",
            196,
            "two sequential individual valuations of the immovable property by the same \
             appraiser should result in the rotation of the appraiser",
            3.1,
        )]);
        let completions = MockCompletions::new()
            .with_response("appraiser rotation sequential valuations")
            .with_response(
                r#"{"summary":"Fixed rotation count conflicts with discretionary rotation.",
                "overlaps":[],
                "contradictions":[{
                    "filename1":"EBA-GL-2020-06.di","excerpt1":"define the number of sequential individual valuations","pageNumber1":235,
                    "filename2":"EBA-GL-2018-06.di","excerpt2":"two sequential individual valuations","pageNumber2":196,
                    "explanation":"A fixed count of two falls inside the range the discretionary rule leaves open.",
                    "type":"CONTRADICTION"
                }]}"#,
            );

        let (pipeline, _deps) = pipeline(search_index, completions);
        let report = pipeline
            .run(
                "Institutions should define the number of sequential individual valuations \
                 of the same property that can be performed by the same valuer.",
                "EBA-GL-2020-06.di_page_235",
                235,
            )
            .await
            .unwrap();

        assert_eq!(report.contradictions.len(), 1);
        assert!(report.overlaps.is_empty());
    }

    #[tokio::test]
    async fn test_thematic_proximity_alone_yields_empty_report() {
        let search_index = MockSearchIndex::new().with_results(vec![candidate(
            "MiFIR.di_page_12",
            12,
            "transparency of trading venues in general",
            0.8,
        )]);
        let completions = MockCompletions::new()
            .with_response("transparency obligations")
            .with_response(r#"{"summary":"","overlaps":[],"contradictions":[]}"#);

        let (pipeline, _deps) = pipeline(search_index, completions);
        let report = pipeline
            .run("high-level transparency goals", "Directive.di_page_3", 3)
            .await
            .unwrap();

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_self_matches_are_filtered_before_classification() {
        let search_index = MockSearchIndex::new().with_results(vec![
            candidate("EBA-GL-2017-06.di_page_12", 12, "same document, other page", 9.0),
            candidate("FIVA 4-2018.di_page_207", 207, "another document", 1.0),
        ]);
        let completions = MockCompletions::new()
            .with_response("query")
            .with_response(r#"{"summary":"","overlaps":[],"contradictions":[]}"#);

        let (pipeline, deps) = pipeline(search_index, completions);
        pipeline
            .run("passage", "EBA-GL-2017-06.di_page_44", 44)
            .await
            .unwrap();

        let classification = &deps.completions.calls()[1];
        assert!(classification.user.contains("another document"));
        assert!(!classification.user.contains("same document, other page"));
        assert!(classification.user.contains("\"count\":1"));
    }

    #[tokio::test]
    async fn test_retrieval_failure_aborts_the_run() {
        let completions = MockCompletions::new().with_response("query");
        let (pipeline, deps) = pipeline(MockSearchIndex::unavailable(), completions);

        let err = pipeline
            .run("passage", "doc.di", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::RetrievalUnavailable { .. }));

        // The classifier is never reached.
        assert_eq!(deps.completions.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_condensation_failure_aborts_before_search() {
        let completions =
            MockCompletions::new().with_error(CompletionsError::Network("timed out".into()));
        let (pipeline, deps) = pipeline(MockSearchIndex::new(), completions);

        let err = pipeline.run("passage", "doc.di", 1).await.unwrap_err();
        assert!(matches!(err, PipelineError::RetrievalUnavailable { .. }));
        assert!(deps.search_index.queries().is_empty());
    }

    #[tokio::test]
    async fn test_classifier_garbage_surfaces_as_parse_error() {
        let completions = MockCompletions::new()
            .with_response("query")
            .with_response("```json maybe later```");
        let (pipeline, _deps) = pipeline(MockSearchIndex::new(), completions);

        let err = pipeline.run("passage", "doc.di", 1).await.unwrap_err();
        assert!(matches!(err, PipelineError::ClassificationParseError { .. }));
    }

    #[tokio::test]
    async fn test_empty_candidate_pool_still_reaches_classifier() {
        let completions = MockCompletions::new()
            .with_response("query")
            .with_response(r#"{"summary":"","overlaps":[],"contradictions":[]}"#);
        let (pipeline, deps) = pipeline(MockSearchIndex::new(), completions);

        let report = pipeline.run("passage", "doc.di", 1).await.unwrap();
        assert!(report.is_empty());
        assert!(deps.completions.calls()[1].user.contains("\"count\":0"));
    }
}
