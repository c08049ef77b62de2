//! Flagged text regions with candidate replacements.
//!
//! A [`Span`] describes one region of a segment's content that a checking
//! service flagged, together with the replacement candidates it offered.
//! Offsets are half-open character offsets into the exact content string
//! the span was produced from. A span is never patched after an edit: any
//! change to the segment invalidates all of its spans, and a fresh check
//! replaces them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a span, unique within one segment's current suggestion set.
///
/// Ids are derived from the flagged position so that re-running a check on
/// unchanged text yields stable ids (`spelling-{segment}-{start}-{word}`,
/// `grammar-{segment}-{start}-{rule}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanId(String);

impl SpanId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant between the two suggestion families.
///
/// Spelling spans group by flagged word for display; grammar spans are
/// always shown individually because their `reason` differs per occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Spelling,
    Grammar,
}

/// One flagged region of a segment's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub id: SpanId,
    pub segment_id: crate::SegmentId,
    pub kind: SpanKind,
    /// Inclusive character offset where the flagged region starts.
    pub start: usize,
    /// Exclusive character offset where the flagged region ends.
    pub end: usize,
    /// The substring `content[start..end]` at the time the span was
    /// produced. Kept for grouping and display; never re-derived.
    pub flagged_text: String,
    /// Ordered replacement candidates. Empty means "no fix known", which
    /// is meaningful information and must still be displayed.
    pub candidates: Vec<String>,
    /// Short human-readable explanation. Grammar spans only.
    pub reason: Option<String>,
}

impl Span {
    /// Build a spelling span with a position-stable id.
    #[must_use]
    pub fn spelling(
        segment_id: crate::SegmentId,
        start: usize,
        end: usize,
        flagged_text: impl Into<String>,
        candidates: Vec<String>,
    ) -> Self {
        let flagged_text = flagged_text.into();
        let id = SpanId::new(format!("spelling-{segment_id}-{start}-{flagged_text}"));
        Self {
            id,
            segment_id,
            kind: SpanKind::Spelling,
            start,
            end,
            flagged_text,
            candidates,
            reason: None,
        }
    }

    /// Build a grammar span. The id embeds the rule so that two different
    /// rules flagging the same position do not collide.
    #[must_use]
    pub fn grammar(
        segment_id: crate::SegmentId,
        start: usize,
        end: usize,
        flagged_text: impl Into<String>,
        candidates: Vec<String>,
        reason: impl Into<String>,
        rule_id: &str,
    ) -> Self {
        let id = SpanId::new(format!("grammar-{segment_id}-{start}-{rule_id}"));
        Self {
            id,
            segment_id,
            kind: SpanKind::Grammar,
            start,
            end,
            flagged_text: flagged_text.into(),
            candidates,
            reason: Some(reason.into()),
        }
    }

    /// Whether this span's offsets still fit within `content`.
    ///
    /// This is the stale-offset guard: after an edit a leftover span may
    /// point past the end of the rewritten content. Such a span must be
    /// discarded, never applied.
    #[must_use]
    pub fn fits(&self, content: &str) -> bool {
        self.start < self.end && self.end <= content.chars().count()
    }

    /// Whether `content[start..end]` still equals `flagged_text`.
    ///
    /// Holds by construction at production time; used by callers as a
    /// stronger validity probe than [`fits`](Self::fits).
    #[must_use]
    pub fn matches_content(&self, content: &str) -> bool {
        crate::edit::char_slice(content, self.start, self.end)
            .is_some_and(|slice| slice == self.flagged_text)
    }

    /// First candidate, if any.
    #[must_use]
    pub fn best_candidate(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }
}

/// Whether a candidate is a bracket-wrapped placeholder.
///
/// The upstream AI rephrase flow emits candidates like `[rephrase this]`
/// that describe an action instead of literal replacement text. They must
/// never be spliced into content verbatim.
#[must_use]
pub fn is_placeholder(candidate: &str) -> bool {
    candidate.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SegmentId;

    fn seg() -> SegmentId {
        SegmentId::new("seg-1")
    }

    #[test]
    fn spelling_id_is_position_stable() {
        let a = Span::spelling(seg(), 4, 7, "teh", vec!["the".into()]);
        let b = Span::spelling(seg(), 4, 7, "teh", vec![]);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str(), "spelling-seg-1-4-teh");
    }

    #[test]
    fn grammar_id_includes_rule() {
        let a = Span::grammar(seg(), 0, 3, "its", vec![], "Possessive", "ITS_IT_S");
        let b = Span::grammar(seg(), 0, 3, "its", vec![], "Agreement", "AGREEMENT");
        assert_ne!(a.id, b.id);
        assert_eq!(a.reason.as_deref(), Some("Possessive"));
    }

    #[test]
    fn round_trip_offsets_hold_at_production() {
        let content = "The quick brown fox";
        let span = Span::spelling(seg(), 4, 9, "quick", vec![]);
        assert!(span.matches_content(content));
    }

    #[test]
    fn fits_rejects_out_of_range_end() {
        let span = Span::spelling(seg(), 4, 9, "quick", vec![]);
        assert!(span.fits("The quick"));
        assert!(!span.fits("The qui"));
    }

    #[test]
    fn fits_rejects_empty_range() {
        let span = Span::spelling(seg(), 3, 3, "", vec![]);
        assert!(!span.fits("The quick"));
    }

    #[test]
    fn fits_counts_chars_not_bytes() {
        // Five chars, seven bytes.
        let content = "héllö";
        let span = Span::spelling(seg(), 1, 5, "héll", vec![]);
        assert!(span.fits(content));
    }

    #[test]
    fn matches_content_detects_drift() {
        let span = Span::spelling(seg(), 4, 9, "quick", vec![]);
        assert!(!span.matches_content("The slack brown fox"));
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder("[rephrase this sentence]"));
        assert!(!is_placeholder("the"));
        assert!(!is_placeholder(""));
    }

    #[test]
    fn best_candidate_is_first() {
        let span = Span::spelling(seg(), 0, 3, "teh", vec!["the".into(), "ten".into()]);
        assert_eq!(span.best_candidate(), Some("the"));
        let none = Span::spelling(seg(), 0, 3, "teh", vec![]);
        assert_eq!(none.best_candidate(), None);
    }
}
