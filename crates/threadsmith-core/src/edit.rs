//! Offset-safe replacement of flagged regions.
//!
//! All spans for a segment carry offsets into the *same* content string.
//! Applying a batch of replacements naively, left to right, would shift
//! every later span's offsets after the first splice. Processing strictly
//! right to left avoids that: once targets are sorted by `start`
//! descending, every remaining target lies entirely before the region just
//! rewritten, so its offsets are still valid against the evolving string.
//!
//! After any call here the caller must treat every span *not* in the
//! target set as invalid — the rewritten content no longer matches the
//! string they were derived from. The correct response is to discard them
//! and run a fresh check, never to shift their offsets incrementally.

use crate::span::{Span, SpanId, is_placeholder};

/// Slice `content` by character offsets, if the range is in bounds.
///
/// Returns `None` for any range that does not fall on the content — the
/// stale-offset case. Never panics on multi-byte text.
#[must_use]
pub fn char_slice(content: &str, start: usize, end: usize) -> Option<&str> {
    let (byte_start, byte_end) = char_range_to_bytes(content, start, end)?;
    Some(&content[byte_start..byte_end])
}

/// Convert a half-open character range to a byte range within `content`.
fn char_range_to_bytes(content: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    if start > end {
        return None;
    }
    let mut byte_start = None;
    let mut byte_end = None;
    for (chars_seen, (byte_idx, _)) in content.char_indices().enumerate() {
        if chars_seen == start {
            byte_start = Some(byte_idx);
        }
        if chars_seen == end {
            byte_end = Some(byte_idx);
            break;
        }
    }
    let total = content.chars().count();
    if start == total {
        byte_start = Some(content.len());
    }
    if end == total {
        byte_end = Some(content.len());
    }
    Some((byte_start?, byte_end?))
}

/// Outcome of a batch application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// The rewritten content.
    pub content: String,
    /// Spans whose replacement was spliced in.
    pub applied: Vec<SpanId>,
    /// Spans skipped: no candidate, placeholder candidate, out-of-range
    /// offsets, or overlap with an already-applied span.
    pub skipped: Vec<SpanId>,
}

/// Targets sorted right-to-left, with out-of-range and overlapping spans
/// dropped. Overlap tie-break: the span with the greater `start` is applied
/// first and wins; any span reaching into it is skipped.
fn plan<'a>(content: &str, targets: &[&'a Span]) -> (Vec<&'a Span>, Vec<SpanId>) {
    let mut ordered: Vec<&Span> = targets.to_vec();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut keep = Vec::with_capacity(ordered.len());
    let mut skipped = Vec::new();
    let mut applied_floor = usize::MAX;
    for span in ordered {
        if !span.fits(content) || span.end > applied_floor {
            skipped.push(span.id.clone());
            continue;
        }
        applied_floor = span.start;
        keep.push(span);
    }
    (keep, skipped)
}

fn splice(buf: &mut String, span: &Span, replacement: &str) {
    // Byte offsets are computed against the current buffer. Right-to-left
    // processing keeps everything before the previous splice untouched, so
    // char offsets into the original content remain correct here.
    if let Some((byte_start, byte_end)) = char_range_to_bytes(buf, span.start, span.end) {
        buf.replace_range(byte_start..byte_end, replacement);
    }
}

/// Apply the same `replacement` to every target span in one pass.
///
/// Input order is irrelevant: targets are sorted internally. An empty
/// `replacement` deletes the flagged regions in place. This is the single-
/// and grouped-apply primitive; the single-target case is just a batch of
/// length one.
#[must_use]
pub fn apply_replacement(content: &str, targets: &[&Span], replacement: &str) -> String {
    let (keep, _) = plan(content, targets);
    let mut buf = content.to_string();
    for span in keep {
        splice(&mut buf, span, replacement);
    }
    buf
}

/// Fix-all primitive: apply each span's *first* candidate in one pass.
///
/// Spans with no candidates are skipped (nothing to apply), as are spans
/// whose best candidate is a bracket-wrapped placeholder. An empty-string
/// candidate is a deliberate delete and is applied. One pass over the full
/// set avoids both the O(n) re-check round trips and the offset drift that
/// sequential single applications would cause.
#[must_use]
pub fn apply_best_candidates(content: &str, spans: &[&Span]) -> BatchOutcome {
    let (keep, mut skipped) = plan(content, spans);
    let mut buf = content.to_string();
    let mut applied = Vec::new();
    for span in keep {
        match span.best_candidate() {
            Some(candidate) if !is_placeholder(candidate) => {
                let replacement = candidate.to_string();
                splice(&mut buf, span, &replacement);
                applied.push(span.id.clone());
            }
            _ => skipped.push(span.id.clone()),
        }
    }
    BatchOutcome {
        content: buf,
        applied,
        skipped,
    }
}
