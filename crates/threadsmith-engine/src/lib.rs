//! Segment orchestration for the thread composer.
//!
//! This crate wires the pure text machinery from `threadsmith-core` and
//! the checker gateway from `threadsmith-check` into a stateful editor.
//! [`ThreadEditor`] owns the segments and the live suggestion set, debounces
//! checks and saves, and stamps every issued check with a generation so
//! that late results from a superseded check are discarded instead of
//! clobbering newer state.
//!
//! The engine is sans-I/O: it never talks to the network or a store
//! itself. Calls return [`Effect`] values describing what the host should
//! do; the host executes them and reports back through
//! [`ThreadEditor::complete_check`] and [`ThreadEditor::complete_save`].

#![forbid(unsafe_code)]

mod debounce;
mod editor;
mod effect;
mod error;
mod status;

pub use debounce::Debouncer;
pub use editor::{ApplyOutcome, CHECK_DEBOUNCE, SAVE_DEBOUNCE, ThreadEditor};
pub use effect::{
    Effect, Persistence, PersistenceError, SaveOp, SavePlan, SaveReport, execute_save,
};
pub use error::ApplyError;
pub use status::{CheckerHealth, EditorStatus, SegmentPhase, SuggestionCounts};
