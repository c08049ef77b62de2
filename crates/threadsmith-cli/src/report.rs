//! Human- and machine-readable check reports.

use serde::Serialize;

use threadsmith_core::{GroupedSpan, Segment, Span};

/// Whole-thread report: totals plus a section per segment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadReport {
    pub spelling: usize,
    pub grammar: usize,
    pub checker_available: bool,
    pub segments: Vec<SegmentReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    pub index: usize,
    pub char_count: usize,
    pub content: String,
    pub spelling: Vec<SpellingEntry>,
    pub grammar: Vec<GrammarEntry>,
}

/// One grouped misspelling: every occurrence of a word, fixed together.
#[derive(Debug, Serialize)]
pub struct SpellingEntry {
    pub word: String,
    pub occurrences: usize,
    pub candidates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GrammarEntry {
    pub flagged: String,
    pub start: usize,
    pub end: usize,
    pub reason: Option<String>,
    pub candidates: Vec<String>,
}

impl SegmentReport {
    pub fn new(segment: &Segment, spelling: Vec<GroupedSpan>, grammar: Vec<Span>) -> Self {
        Self {
            index: segment.index,
            char_count: segment.char_count,
            content: segment.content.clone(),
            spelling: spelling
                .into_iter()
                .map(|group| SpellingEntry {
                    word: group.flagged_text,
                    occurrences: group.occurrences,
                    candidates: group.candidates,
                })
                .collect(),
            grammar: grammar
                .into_iter()
                .map(|span| GrammarEntry {
                    flagged: span.flagged_text,
                    start: span.start,
                    end: span.end,
                    reason: span.reason,
                    candidates: span.candidates,
                })
                .collect(),
        }
    }
}

impl ThreadReport {
    /// Plain-text rendering for terminal use.
    pub fn print(&self) {
        if !self.checker_available {
            println!("checker unavailable; no suggestions");
        }
        for segment in &self.segments {
            println!("segment {} ({} chars):", segment.index + 1, segment.char_count);
            if segment.spelling.is_empty() && segment.grammar.is_empty() {
                println!("  no suggestions");
            }
            for entry in &segment.spelling {
                let occurrences = if entry.occurrences > 1 {
                    format!(" (x{})", entry.occurrences)
                } else {
                    String::new()
                };
                let candidates = if entry.candidates.is_empty() {
                    "no fix known".to_string()
                } else {
                    entry.candidates.join(", ")
                };
                println!("  spelling: {}{occurrences} -> {candidates}", entry.word);
            }
            for entry in &segment.grammar {
                let reason = entry.reason.as_deref().unwrap_or("grammar issue");
                println!(
                    "  grammar [{}..{}]: {} ({reason})",
                    entry.start, entry.end, entry.flagged
                );
                if !entry.candidates.is_empty() {
                    println!("    -> {}", entry.candidates.join(", "));
                }
            }
        }
        println!(
            "{} spelling, {} grammar suggestion(s)",
            self.spelling, self.grammar
        );
    }
}
