//! The segment orchestrator.
//!
//! [`ThreadEditor`] owns the thread's segments, the live suggestion set,
//! and the timers and generation counters that keep asynchronous check
//! results consistent with a text that keeps changing underneath them.
//!
//! # Concurrency model
//!
//! Single-threaded and cooperative: the host calls in on one thread, and
//! every slow operation leaves the engine as an [`Effect`] to be executed
//! elsewhere. Multiple checks may be in flight at once and resolve in any
//! order; within one segment the last-issued check wins. Each issued check
//! carries the segment's generation at issue time, and a completion whose
//! generation is no longer current is discarded — logical cancellation
//! that works whether or not the transport aborted the request.
//!
//! # Staleness
//!
//! An edit invalidates every span of the edited segment, but the spans are
//! not dropped eagerly — the old list stays visible until the next check
//! resolves, avoiding suggestion-list flicker. The price is that an apply
//! may arrive against stale offsets; those spans are validated against the
//! current content and silently discarded when they no longer fit.

use ahash::AHashMap;
use web_time::{Duration, Instant};

use threadsmith_check::CheckOutcome;
use threadsmith_core::{
    GroupedSpan, Segment, SegmentId, Span, SpanId, SpanKind, apply_best_candidates,
    apply_replacement, group_spelling, is_placeholder,
};

use crate::debounce::Debouncer;
use crate::effect::{Effect, SaveOp, SavePlan, SaveReport};
use crate::error::ApplyError;
use crate::status::{EditorStatus, SegmentPhase, SuggestionCounts};

/// Quiet period before an edited segment is re-checked.
pub const CHECK_DEBOUNCE: Duration = Duration::from_millis(800);

/// Quiet period before the thread is persisted.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Result of an apply call that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// At least one target span was rewritten into the content.
    Applied,
    /// Every target was stale; nothing changed, a fresh check is queued.
    StaleDiscarded,
}

/// Orchestrates segments, suggestions, debounced checks, and saves.
pub struct ThreadEditor {
    segments: Vec<Segment>,
    suggestions: Vec<Span>,
    generations: AHashMap<SegmentId, u64>,
    check_debounce: AHashMap<SegmentId, Debouncer<String>>,
    save_debounce: Debouncer<()>,
    phases: AHashMap<SegmentId, SegmentPhase>,
    /// Draft ids superseded by store-assigned ones. Check effects issued
    /// before the swap complete under the old id; this resolves them.
    id_aliases: AHashMap<SegmentId, SegmentId>,
    pending_deletes: Vec<SegmentId>,
    title: Option<String>,
    title_dirty: bool,
    draft_counter: u64,
    status: EditorStatus,
    torn_down: bool,
    check_delay: Duration,
}

impl ThreadEditor {
    /// A fresh editor with one empty draft segment.
    #[must_use]
    pub fn new() -> Self {
        Self::from_segments(vec![Segment::empty(SegmentId::draft(1), 0)])
    }

    /// An editor over persisted segments. Indices are normalized to be
    /// contiguous regardless of what the store handed back.
    #[must_use]
    pub fn from_segments(mut segments: Vec<Segment>) -> Self {
        if segments.is_empty() {
            segments.push(Segment::empty(SegmentId::draft(1), 0));
        }
        for (index, segment) in segments.iter_mut().enumerate() {
            segment.index = index;
        }
        // Start local id numbering past any drafts that were handed in.
        let draft_counter = segments
            .iter()
            .filter_map(|s| s.id.as_str().strip_prefix(threadsmith_core::DRAFT_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            .max(1);
        Self {
            segments,
            suggestions: Vec::new(),
            generations: AHashMap::new(),
            check_debounce: AHashMap::new(),
            save_debounce: Debouncer::new(SAVE_DEBOUNCE),
            phases: AHashMap::new(),
            id_aliases: AHashMap::new(),
            pending_deletes: Vec::new(),
            title: None,
            title_dirty: false,
            draft_counter,
            status: EditorStatus::default(),
            torn_down: false,
            check_delay: CHECK_DEBOUNCE,
        }
    }

    // ── Read side ───────────────────────────────────────────────────

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment(&self, id: &SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| &s.id == id)
    }

    /// Current spans for a segment, optionally filtered by kind.
    #[must_use]
    pub fn suggestions_for(&self, id: &SegmentId, kind: Option<SpanKind>) -> Vec<&Span> {
        self.suggestions
            .iter()
            .filter(|s| &s.segment_id == id)
            .filter(|s| kind.is_none_or(|k| s.kind == k))
            .collect()
    }

    /// Grouped spelling suggestions for display.
    #[must_use]
    pub fn grouped_spelling(&self, id: &SegmentId) -> Vec<GroupedSpan> {
        let spans: Vec<Span> = self
            .suggestions
            .iter()
            .filter(|s| &s.segment_id == id)
            .cloned()
            .collect();
        group_spelling(&spans)
    }

    /// Thread-wide suggestion counts.
    #[must_use]
    pub fn suggestion_counts(&self) -> SuggestionCounts {
        let mut counts = SuggestionCounts::default();
        for span in &self.suggestions {
            match span.kind {
                SpanKind::Spelling => counts.spelling += 1,
                SpanKind::Grammar => counts.grammar += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn status(&self) -> &EditorStatus {
        &self.status
    }

    #[must_use]
    pub fn phase(&self, id: &SegmentId) -> SegmentPhase {
        self.phases.get(id).copied().unwrap_or_default()
    }

    // ── Segment operations ──────────────────────────────────────────

    /// Replace a segment's content.
    ///
    /// Recomputes the weighted count immediately and schedules the check
    /// and save debouncers (when auto-save is on). Existing spans for the
    /// segment stay visible until the next check resolves.
    pub fn edit_segment(&mut self, id: &SegmentId, content: impl Into<String>, now: Instant) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| &s.id == id) else {
            return false;
        };
        segment.set_content(content);
        let snapshot = segment.content.clone();
        self.phases.insert(id.clone(), SegmentPhase::Dirty);
        if self.status.auto_save {
            self.schedule_check(id, snapshot, now);
            self.save_debounce.schedule(now, ());
        }
        true
    }

    /// Insert an empty segment after `after`, re-indexing the rest.
    pub fn add_segment(&mut self, after: &SegmentId, now: Instant) -> Option<SegmentId> {
        let position = self.segments.iter().position(|s| &s.id == after)?;
        self.draft_counter += 1;
        let id = SegmentId::draft(self.draft_counter);
        self.segments
            .insert(position + 1, Segment::empty(id.clone(), position + 1));
        self.reindex();
        if self.status.auto_save {
            self.save_debounce.schedule(now, ());
        }
        Some(id)
    }

    /// Remove a segment, dropping its spans and closing the index gap.
    ///
    /// The last remaining segment cannot be removed.
    pub fn remove_segment(&mut self, id: &SegmentId, now: Instant) -> bool {
        if self.segments.len() <= 1 {
            return false;
        }
        let Some(position) = self.segments.iter().position(|s| &s.id == id) else {
            return false;
        };
        let removed = self.segments.remove(position);
        self.suggestions.retain(|s| s.segment_id != removed.id);
        self.generations.remove(&removed.id);
        self.phases.remove(&removed.id);
        self.check_debounce.remove(&removed.id);
        if !removed.id.is_draft() {
            self.pending_deletes.push(removed.id);
        }
        self.reindex();
        if self.status.auto_save {
            self.save_debounce.schedule(now, ());
        }
        true
    }

    /// Rename the thread; flushed on the next save pass.
    pub fn set_title(&mut self, title: impl Into<String>, now: Instant) {
        self.title = Some(title.into());
        self.title_dirty = true;
        if self.status.auto_save {
            self.save_debounce.schedule(now, ());
        }
    }

    // ── Suggestion operations ───────────────────────────────────────

    /// Apply `replacement` over one span.
    pub fn apply_suggestion(
        &mut self,
        span_id: &SpanId,
        replacement: &str,
        now: Instant,
    ) -> Result<ApplyOutcome, ApplyError> {
        self.apply_suggestions(std::slice::from_ref(span_id), replacement, now)
    }

    /// Apply the same `replacement` over several spans (a grouped accept).
    ///
    /// Targets are grouped per segment and each segment is rewritten in
    /// one right-to-left pass. Stale targets are discarded silently and a
    /// fresh check is queued for their segment.
    pub fn apply_suggestions(
        &mut self,
        span_ids: &[SpanId],
        replacement: &str,
        now: Instant,
    ) -> Result<ApplyOutcome, ApplyError> {
        if is_placeholder(replacement) {
            return Err(ApplyError::InvalidReplacement {
                candidate: replacement.to_string(),
            });
        }

        let mut by_segment: AHashMap<SegmentId, Vec<Span>> = AHashMap::new();
        for span_id in span_ids {
            let span = self
                .suggestions
                .iter()
                .find(|s| &s.id == span_id)
                .cloned()
                .ok_or_else(|| ApplyError::UnknownSpan {
                    id: span_id.to_string(),
                })?;
            by_segment.entry(span.segment_id.clone()).or_default().push(span);
        }

        let mut applied_any = false;
        for (segment_id, spans) in by_segment {
            let Some(segment) = self.segment(&segment_id) else {
                continue;
            };
            let content = segment.content.clone();
            let (live, stale): (Vec<Span>, Vec<Span>) =
                spans.into_iter().partition(|s| s.fits(&content));

            if !stale.is_empty() {
                tracing::debug!(
                    segment = %segment_id,
                    count = stale.len(),
                    "stale spans discarded on apply"
                );
                self.suggestions
                    .retain(|s| !stale.iter().any(|dead| dead.id == s.id));
                if self.status.auto_save {
                    self.schedule_check(&segment_id, content.clone(), now);
                }
            }
            if live.is_empty() {
                continue;
            }

            let targets: Vec<&Span> = live.iter().collect();
            let rewritten = apply_replacement(&content, &targets, replacement);
            self.edit_segment(&segment_id, rewritten, now);
            applied_any = true;
        }

        Ok(if applied_any {
            ApplyOutcome::Applied
        } else {
            ApplyOutcome::StaleDiscarded
        })
    }

    /// Drop one suggestion without touching the content.
    pub fn dismiss_suggestion(&mut self, span_id: &SpanId) -> bool {
        let before = self.suggestions.len();
        self.suggestions.retain(|s| &s.id != span_id);
        self.suggestions.len() != before
    }

    /// Drop every suggestion.
    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// Apply every current suggestion's best candidate, one pass per
    /// segment, then issue exactly one check effect per affected segment
    /// and one save effect — never a cycle per span.
    pub fn fix_all(&mut self) -> Vec<Effect> {
        if self.torn_down {
            return Vec::new();
        }
        let mut effects = Vec::new();
        let segment_ids: Vec<SegmentId> = self.segments.iter().map(|s| s.id.clone()).collect();

        let mut touched = false;
        for segment_id in segment_ids {
            let spans: Vec<Span> = self
                .suggestions
                .iter()
                .filter(|s| s.segment_id == segment_id)
                .cloned()
                .collect();
            if spans.is_empty() {
                continue;
            }
            let Some(segment) = self.segments.iter_mut().find(|s| s.id == segment_id) else {
                continue;
            };
            let targets: Vec<&Span> = spans.iter().collect();
            let outcome = apply_best_candidates(&segment.content, &targets);
            if outcome.applied.is_empty() {
                continue;
            }
            segment.set_content(outcome.content);
            let snapshot = segment.content.clone();
            self.suggestions.retain(|s| s.segment_id != segment_id);
            if let Some(debouncer) = self.check_debounce.get_mut(&segment_id) {
                debouncer.cancel();
            }
            let generation = self.bump_generation(&segment_id);
            self.phases.insert(segment_id.clone(), SegmentPhase::Checking);
            effects.push(Effect::Check {
                segment_id,
                content: snapshot,
                generation,
            });
            touched = true;
        }

        if touched {
            self.status.spell_checking = true;
            self.status.grammar_checking = true;
            self.save_debounce.cancel();
            self.status.saving = true;
            effects.push(Effect::Save {
                plan: self.build_save_plan(),
            });
        }
        effects
    }

    // ── Scheduling and completions ──────────────────────────────────

    /// Advance timers; returns the effects that came due.
    ///
    /// Checks fire per segment with a freshly bumped generation, which is
    /// what logically cancels any older in-flight check for the same
    /// segment.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        if self.torn_down {
            return Vec::new();
        }
        let mut effects = Vec::new();

        let segment_ids: Vec<SegmentId> = self.segments.iter().map(|s| s.id.clone()).collect();
        for segment_id in segment_ids {
            let due = self
                .check_debounce
                .get_mut(&segment_id)
                .and_then(|debouncer| debouncer.poll(now));
            if let Some(content) = due {
                let generation = self.bump_generation(&segment_id);
                self.phases.insert(segment_id.clone(), SegmentPhase::Checking);
                self.status.spell_checking = true;
                self.status.grammar_checking = true;
                effects.push(Effect::Check {
                    segment_id,
                    content,
                    generation,
                });
            }
        }

        if self.save_debounce.poll(now).is_some() {
            self.status.saving = true;
            effects.push(Effect::Save {
                plan: self.build_save_plan(),
            });
        }
        effects
    }

    /// Accept a check result.
    ///
    /// The result is discarded unless `generation` is still the segment's
    /// current one — the last-issued check wins, and an old in-flight
    /// result can never overwrite a newer one. Acceptance atomically
    /// replaces the segment's previous spans. Completions keyed by a draft
    /// id that a save has since replaced are resolved to the durable id,
    /// not dropped.
    pub fn complete_check(
        &mut self,
        segment_id: &SegmentId,
        generation: u64,
        outcome: CheckOutcome,
    ) {
        if self.torn_down {
            return;
        }
        // A save may have swapped the draft id for a durable one while the
        // check was in flight; resolve to the current id before matching.
        let segment_id = self
            .id_aliases
            .get(segment_id)
            .unwrap_or(segment_id)
            .clone();
        let current = self.generations.get(&segment_id).copied().unwrap_or(0);
        if generation != current {
            tracing::debug!(
                segment = %segment_id,
                generation,
                current,
                "stale check result discarded"
            );
            return;
        }
        if self.segment(&segment_id).is_none() {
            return;
        }

        self.status.checker = outcome.health;
        self.suggestions.retain(|s| s.segment_id != segment_id);
        for mut span in outcome.into_spans() {
            span.segment_id = segment_id.clone();
            self.suggestions.push(span);
        }
        self.phases.insert(segment_id.clone(), SegmentPhase::Clean);

        let any_checking = self
            .phases
            .values()
            .any(|phase| *phase == SegmentPhase::Checking);
        self.status.spell_checking = any_checking;
        self.status.grammar_checking = any_checking;
    }

    /// Accept a save result.
    ///
    /// Durable ids assigned to draft segments are swapped in everywhere.
    /// A failed save raises the non-blocking `save_failed` flag; the
    /// in-memory content is untouched and remains authoritative.
    pub fn complete_save(&mut self, report: &SaveReport) {
        if self.torn_down {
            return;
        }
        self.status.saving = false;
        self.status.save_failed = !report.success();
        if !report.success() {
            tracing::warn!(failed = report.failed, "save pass reported failures");
        }
        for (draft, durable) in &report.assigned_ids {
            self.id_aliases.insert(draft.clone(), durable.clone());
            if let Some(segment) = self.segments.iter_mut().find(|s| &s.id == draft) {
                segment.id = durable.clone();
            }
            for span in &mut self.suggestions {
                if &span.segment_id == draft {
                    span.segment_id = durable.clone();
                }
            }
            if let Some(generation) = self.generations.remove(draft) {
                self.generations.insert(durable.clone(), generation);
            }
            if let Some(phase) = self.phases.remove(draft) {
                self.phases.insert(durable.clone(), phase);
            }
            if let Some(debouncer) = self.check_debounce.remove(draft) {
                self.check_debounce.insert(durable.clone(), debouncer);
            }
        }
    }

    /// Build an immediate save effect, bypassing the debounce window.
    pub fn save_now(&mut self) -> Effect {
        self.save_debounce.cancel();
        self.status.saving = true;
        Effect::Save {
            plan: self.build_save_plan(),
        }
    }

    /// Toggle automatic checking and saving on edit.
    pub fn set_auto_save(&mut self, enabled: bool) {
        self.status.auto_save = enabled;
    }

    /// Cancel every timer and refuse all further work. Call on shutdown
    /// so no debounce callback mutates discarded state.
    pub fn teardown(&mut self) {
        for debouncer in self.check_debounce.values_mut() {
            debouncer.cancel();
        }
        self.save_debounce.cancel();
        self.torn_down = true;
    }

    // ── Internals ───────────────────────────────────────────────────

    fn schedule_check(&mut self, id: &SegmentId, content: String, now: Instant) {
        let delay = self.check_delay;
        self.check_debounce
            .entry(id.clone())
            .or_insert_with(|| Debouncer::new(delay))
            .schedule(now, content);
    }

    fn bump_generation(&mut self, id: &SegmentId) -> u64 {
        let generation = self.generations.entry(id.clone()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn reindex(&mut self) {
        for (index, segment) in self.segments.iter_mut().enumerate() {
            segment.index = index;
        }
    }

    fn build_save_plan(&mut self) -> SavePlan {
        let mut ops = Vec::new();
        for id in self.pending_deletes.drain(..) {
            ops.push(SaveOp::DeleteSegment { id });
        }
        if self.title_dirty {
            if let Some(title) = &self.title {
                ops.push(SaveOp::UpdateThread {
                    title: title.clone(),
                });
            }
            self.title_dirty = false;
        }
        for segment in &self.segments {
            if segment.id.is_draft() {
                ops.push(SaveOp::CreateSegment {
                    local_id: segment.id.clone(),
                    content: segment.content.clone(),
                    index: segment.index,
                });
            } else {
                ops.push(SaveOp::UpdateSegment {
                    id: segment.id.clone(),
                    content: segment.content.clone(),
                });
            }
        }
        SavePlan { ops }
    }
}

impl Default for ThreadEditor {
    fn default() -> Self {
        Self::new()
    }
}
