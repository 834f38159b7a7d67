//! Excerpt localization and highlight rendering.
//!
//! Excerpts come back from the classifier as free-form text that rarely
//! byte-matches the stored page (line wrapping and repeated spaces differ),
//! so matching is whitespace-tolerant: the excerpt is split on whitespace,
//! each token regex-escaped, and the tokens rejoined with `\s+`.
//!
//! Localization is a fold over an ordered list of non-overlapping match
//! spans computed against the immutable page content, followed by a single
//! rendering pass. Each excerpt claims at most its first occurrence that
//! does not overlap an earlier claim; an excerpt that fails to relocate is
//! skipped without error. Escaping happens exactly once per output region,
//! after all spans are claimed, so excerpt text can never break out of the
//! markup structure.

use regex::Regex;

use crate::domains::differences::{Difference, DifferenceKind};

/// One excerpt to locate inside a page, ready for rendering.
#[derive(Debug, Clone)]
pub struct ExcerptHighlight {
    pub excerpt: String,
    pub kind: DifferenceKind,
    pub diff_key: String,
}

/// Stable key correlating a rendered highlight with its result card.
///
/// Pure function of the two document identities and the finding's ordinal,
/// so the same finding resolves to the same key across independent renders
/// of either side of a comparison.
pub fn diff_key(document_id1: &str, document_id2: &str, ordinal: usize) -> String {
    format!("{document_id1}-{document_id2}-{ordinal}")
}

/// Highlights for one rendered page: side-1 excerpts of the differences
/// located on that page, keyed by their ordinal in the filtered list.
pub fn page_highlights(differences: &[Difference], page: i32) -> Vec<ExcerptHighlight> {
    differences
        .iter()
        .filter(|d| d.page_number1 == page)
        .enumerate()
        .map(|(ordinal, d)| ExcerptHighlight {
            excerpt: d.excerpt1.clone(),
            kind: d.kind,
            diff_key: diff_key(&d.filename1, &d.filename2, ordinal),
        })
        .collect()
}

/// Escape text for embedding into markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Whitespace-tolerant literal pattern for one excerpt. None when the
/// excerpt is blank after trimming.
fn whitespace_tolerant_pattern(excerpt: &str) -> Option<String> {
    let tokens: Vec<String> = excerpt.split_whitespace().map(|t| regex::escape(t)).collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(r"\s+"))
    }
}

struct ClaimedSpan {
    start: usize,
    end: usize,
    highlight_index: usize,
}

/// Claim one non-overlapping span per locatable excerpt, in excerpt order.
fn claim_spans(content: &str, highlights: &[ExcerptHighlight]) -> Vec<ClaimedSpan> {
    let mut claimed: Vec<ClaimedSpan> = Vec::new();

    for (highlight_index, highlight) in highlights.iter().enumerate() {
        let Some(pattern) = whitespace_tolerant_pattern(&highlight.excerpt) else {
            continue;
        };
        let Ok(re) = Regex::new(&pattern) else {
            // Pattern over the regex size limit; treat as a relocation miss.
            continue;
        };

        let hit = re
            .find_iter(content)
            .find(|m| !claimed.iter().any(|c| m.start() < c.end && c.start < m.end()));

        if let Some(m) = hit {
            claimed.push(ClaimedSpan {
                start: m.start(),
                end: m.end(),
                highlight_index,
            });
        }
    }

    claimed.sort_by_key(|c| c.start);
    claimed
}

fn badge_classes(kind: DifferenceKind) -> &'static str {
    match kind {
        DifferenceKind::Contradiction => "bg-red-500/30 text-red-100 border border-red-400/70",
        DifferenceKind::Overlap => "bg-emerald-500/30 text-emerald-100 border border-emerald-400/70",
    }
}

/// Render page content with each located excerpt wrapped in a styled span
/// carrying its diff key.
pub fn render_highlighted(content: &str, highlights: &[ExcerptHighlight]) -> String {
    let spans = claim_spans(content, highlights);

    let mut html = String::with_capacity(content.len() + spans.len() * 160);
    let mut cursor = 0;

    for span in &spans {
        html.push_str(&escape_html(&content[cursor..span.start]));

        let highlight = &highlights[span.highlight_index];
        html.push_str("<span class=\"");
        html.push_str(badge_classes(highlight.kind));
        html.push_str(" rounded px-0.5 py-0.5 inline-block cursor-pointer\" data-diff-key=\"");
        html.push_str(&escape_html(&highlight.diff_key));
        html.push_str("\"><span class=\"align-middle\">");
        html.push_str(&escape_html(highlight.excerpt.trim()));
        html.push_str("</span></span>");

        cursor = span.end;
    }

    html.push_str(&escape_html(&content[cursor..]));
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight(excerpt: &str, kind: DifferenceKind, key: &str) -> ExcerptHighlight {
        ExcerptHighlight {
            excerpt: excerpt.to_string(),
            kind,
            diff_key: key.to_string(),
        }
    }

    #[test]
    fn test_whitespace_variants_still_match() {
        // Multiple spaces in the excerpt, newline in the page.
        let content = "Institutions should ensure\nadequate rotation of valuers.";
        let highlights = [highlight(
            "should   ensure adequate",
            DifferenceKind::Overlap,
            "a-b-0",
        )];

        let html = render_highlighted(content, &highlights);
        assert!(html.contains("data-diff-key=\"a-b-0\""));
        // Displayed content is the trimmed excerpt, internal spacing intact.
        assert!(html.contains("should   ensure adequate"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let content = "Alpha beta gamma. Alpha beta gamma.";
        let highlights = [
            highlight("Alpha beta", DifferenceKind::Overlap, "x-y-0"),
            highlight("gamma", DifferenceKind::Contradiction, "x-y-1"),
        ];

        let first = render_highlighted(content, &highlights);
        let second = render_highlighted(content, &highlights);
        assert_eq!(first, second);
    }

    #[test]
    fn test_markup_sensitive_characters_never_escape_unencoded() {
        let content = "Limit is <= 5 & \"strict\" for B's venue <marker>";
        let highlights = [highlight(
            "<= 5 & \"strict\"",
            DifferenceKind::Contradiction,
            "a-b-0",
        )];

        let html = render_highlighted(content, &highlights);
        assert!(html.contains("&lt;marker&gt;"));
        assert!(html.contains("&lt;= 5 &amp; &quot;strict&quot;"));
        // The only raw angle brackets belong to the span elements.
        let stripped = html
            .replace("<span class=", "")
            .replace("</span>", "")
            .replace("\">", "");
        assert!(!stripped.contains('<'));
    }

    #[test]
    fn test_each_excerpt_claims_at_most_one_occurrence() {
        let content = "rotation of valuers and rotation of valuers";
        let highlights = [highlight("rotation of valuers", DifferenceKind::Overlap, "k-0")];

        let html = render_highlighted(content, &highlights);
        assert_eq!(html.matches("data-diff-key").count(), 1);
        // The second occurrence stays plain text.
        assert!(html.contains("and rotation of valuers"));
    }

    #[test]
    fn test_later_excerpt_cannot_claim_text_already_claimed() {
        let content = "fixed rotation count of two valuers";
        let highlights = [
            highlight("fixed rotation count", DifferenceKind::Contradiction, "k-0"),
            highlight("rotation count of two", DifferenceKind::Overlap, "k-1"),
        ];

        let html = render_highlighted(content, &highlights);
        // First excerpt wins its span; the overlapping second finds no
        // non-overlapping occurrence and is skipped.
        assert_eq!(html.matches("data-diff-key").count(), 1);
        assert!(html.contains("data-diff-key=\"k-0\""));
    }

    #[test]
    fn test_blank_and_unlocatable_excerpts_are_skipped() {
        let content = "operative wording on this page";
        let highlights = [
            highlight("   ", DifferenceKind::Overlap, "k-0"),
            highlight("wording from a different page", DifferenceKind::Overlap, "k-1"),
            highlight("operative wording", DifferenceKind::Overlap, "k-2"),
        ];

        let html = render_highlighted(content, &highlights);
        assert_eq!(html.matches("data-diff-key").count(), 1);
        assert!(html.contains("data-diff-key=\"k-2\""));
    }

    #[test]
    fn test_kind_selects_styling() {
        let content = "first finding and second finding";
        let highlights = [
            highlight("first finding", DifferenceKind::Contradiction, "k-0"),
            highlight("second finding", DifferenceKind::Overlap, "k-1"),
        ];

        let html = render_highlighted(content, &highlights);
        assert!(html.contains("bg-red-500/30"));
        assert!(html.contains("bg-emerald-500/30"));
    }

    #[test]
    fn test_diff_key_is_stable_across_renders() {
        assert_eq!(
            diff_key("EBA-GL-2020-06.di", "EBA-GL-2018-06.di", 2),
            diff_key("EBA-GL-2020-06.di", "EBA-GL-2018-06.di", 2),
        );
        assert_ne!(
            diff_key("EBA-GL-2020-06.di", "EBA-GL-2018-06.di", 2),
            diff_key("EBA-GL-2020-06.di", "EBA-GL-2018-06.di", 3),
        );
    }

    #[test]
    fn test_page_highlights_filters_by_side_one_page() {
        let diff = |page1: i32, excerpt: &str| Difference {
            filename1: "a.di".to_string(),
            excerpt1: excerpt.to_string(),
            page_number1: page1,
            filename2: "b.di".to_string(),
            excerpt2: String::new(),
            page_number2: 9,
            explanation: String::new(),
            kind: DifferenceKind::Overlap,
        };

        let differences = vec![diff(4, "on page four"), diff(5, "elsewhere"), diff(4, "also four")];
        let highlights = page_highlights(&differences, 4);

        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].diff_key, "a.di-b.di-0");
        assert_eq!(highlights[1].diff_key, "a.di-b.di-1");
        assert_eq!(highlights[1].excerpt, "also four");
    }

    #[test]
    fn test_excerpt_with_regex_metacharacters_matches_literally() {
        let content = "threshold (2) applies [only] to venues.";
        let highlights = [highlight(
            "threshold (2) applies [only]",
            DifferenceKind::Overlap,
            "k-0",
        )];

        let html = render_highlighted(content, &highlights);
        assert!(html.contains("data-diff-key=\"k-0\""));
    }
}
