//! Display-oriented grouping of same-word spelling spans.
//!
//! A common misspelling often appears several times in one segment. The
//! suggestion list shows it once, with an occurrence count and the union
//! of the candidates offered at each site, so a single accept can fix all
//! of them. Grouping is recomputed from the live span set on every check
//! cycle and never persisted.
//!
//! Keys are the exact `flagged_text` — case-sensitive, so "Teh" and "teh"
//! group apart. Grammar spans are never grouped: their `reason` can differ
//! per occurrence, so each is shown individually.

use ahash::AHashMap;

use crate::span::{Span, SpanId, SpanKind};

/// Aggregation of all spelling spans flagging the same word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedSpan {
    /// The shared flagged word (exact, case-sensitive).
    pub flagged_text: String,
    /// How many spans were merged.
    pub occurrences: usize,
    /// Member span ids in order of appearance (ascending `start`).
    pub member_ids: Vec<SpanId>,
    /// Union of member candidate lists, de-duplicated, first-seen order.
    pub candidates: Vec<String>,
    /// `start` of the earliest member; display sort tie-break.
    pub first_start: usize,
}

/// Group spelling spans by flagged word.
///
/// Non-spelling spans in the input are ignored. The result is sorted by
/// `(occurrences desc, first_start asc)` — most frequent misspelling
/// first, earliest occurrence first among ties. A group with zero
/// candidates is kept: "no known fix" is information, not an error.
#[must_use]
pub fn group_spelling(spans: &[Span]) -> Vec<GroupedSpan> {
    let mut ordered: Vec<&Span> = spans
        .iter()
        .filter(|s| s.kind == SpanKind::Spelling)
        .collect();
    ordered.sort_by_key(|s| s.start);

    let mut groups: Vec<GroupedSpan> = Vec::new();
    let mut by_word: AHashMap<&str, usize> = AHashMap::new();
    for span in ordered {
        match by_word.get(span.flagged_text.as_str()) {
            Some(&idx) => {
                let group = &mut groups[idx];
                group.occurrences += 1;
                group.member_ids.push(span.id.clone());
                for candidate in &span.candidates {
                    if !group.candidates.contains(candidate) {
                        group.candidates.push(candidate.clone());
                    }
                }
            }
            None => {
                by_word.insert(span.flagged_text.as_str(), groups.len());
                groups.push(GroupedSpan {
                    flagged_text: span.flagged_text.clone(),
                    occurrences: 1,
                    member_ids: vec![span.id.clone()],
                    candidates: span.candidates.clone(),
                    first_start: span.start,
                });
            }
        }
    }

    groups.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then(a.first_start.cmp(&b.first_start))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SegmentId;

    fn seg() -> SegmentId {
        SegmentId::new("seg-1")
    }

    fn spelling(start: usize, word: &str, candidates: &[&str]) -> Span {
        Span::spelling(
            seg(),
            start,
            start + word.chars().count(),
            word,
            candidates.iter().map(|c| (*c).to_string()).collect(),
        )
    }

    #[test]
    fn grouping_is_deterministic() {
        let spans = vec![
            spelling(0, "teh", &["the"]),
            spelling(10, "teh", &["the", "teh"]),
            spelling(20, "teh", &["the"]),
        ];
        let groups = group_spelling(&spans);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.occurrences, 3);
        assert_eq!(group.candidates, vec!["the", "teh"]);
        assert_eq!(
            group.member_ids,
            vec![
                spans[0].id.clone(),
                spans[1].id.clone(),
                spans[2].id.clone()
            ]
        );
    }

    #[test]
    fn members_sorted_by_start_regardless_of_input_order() {
        let spans = vec![
            spelling(20, "teh", &[]),
            spelling(0, "teh", &[]),
            spelling(10, "teh", &[]),
        ];
        let groups = group_spelling(&spans);
        assert_eq!(
            groups[0].member_ids,
            vec![
                spans[1].id.clone(),
                spans[2].id.clone(),
                spans[0].id.clone()
            ]
        );
        assert_eq!(groups[0].first_start, 0);
    }

    #[test]
    fn sorted_by_occurrences_then_position() {
        let spans = vec![
            spelling(0, "once", &[]),
            spelling(5, "twice", &[]),
            spelling(15, "twice", &[]),
            spelling(30, "also", &[]),
        ];
        let groups = group_spelling(&spans);
        assert_eq!(groups[0].flagged_text, "twice");
        // Ties broken by earliest occurrence.
        assert_eq!(groups[1].flagged_text, "once");
        assert_eq!(groups[2].flagged_text, "also");
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let spans = vec![spelling(0, "Teh", &[]), spelling(10, "teh", &[])];
        let groups = group_spelling(&spans);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn zero_candidate_group_is_kept() {
        let groups = group_spelling(&[spelling(0, "xyzzy", &[])]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].candidates.is_empty());
    }

    #[test]
    fn grammar_spans_are_ignored() {
        let grammar = Span::grammar(seg(), 0, 3, "its", vec![], "Possessive", "ITS");
        let spans = vec![grammar, spelling(5, "teh", &["the"])];
        let groups = group_spelling(&spans);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].flagged_text, "teh");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_spelling(&[]).is_empty());
    }
}
