//! Observable editor state for the UI layer.
//!
//! The UI never sees an exception from the checker or the store; it sees
//! these flags. During checker unavailability the suggestion list simply
//! shows zero suggestions and the health field drives a small degraded-
//! capability indicator.

pub use threadsmith_check::CheckerHealth;

/// Status flags exposed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorStatus {
    /// A spelling check is in flight for at least one segment.
    pub spell_checking: bool,
    /// A grammar check is in flight for at least one segment.
    pub grammar_checking: bool,
    /// A save pass is in flight.
    pub saving: bool,
    /// The last save pass reported at least one failure. Content is still
    /// held in memory; nothing typed was lost.
    pub save_failed: bool,
    /// Health observed on the most recent completed check.
    pub checker: CheckerHealth,
    /// Whether edits schedule checks and saves automatically.
    pub auto_save: bool,
}

impl Default for EditorStatus {
    fn default() -> Self {
        Self {
            spell_checking: false,
            grammar_checking: false,
            saving: false,
            save_failed: false,
            checker: CheckerHealth::Available,
            auto_save: true,
        }
    }
}

/// Aggregate suggestion counts across the whole thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestionCounts {
    pub spelling: usize,
    pub grammar: usize,
}

impl SuggestionCounts {
    #[must_use]
    pub fn total(self) -> usize {
        self.spelling + self.grammar
    }
}

/// Per-segment check lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentPhase {
    /// Suggestions match the current content.
    #[default]
    Clean,
    /// Content changed since the last completed check.
    Dirty,
    /// A check for the current content is in flight.
    Checking,
}
