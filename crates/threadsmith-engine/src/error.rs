//! Errors surfaced by apply operations.
//!
//! Most failure modes here are deliberately *not* errors: a stale span is
//! discarded silently and triggers a fresh check, checker unavailability
//! is a status flag, and save failures surface through
//! [`EditorStatus`](crate::EditorStatus). Only caller mistakes reach this
//! enum.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// The replacement is a bracket-wrapped placeholder ("manual rephrase
    /// needed"), which must never be spliced into content verbatim.
    #[error("replacement is a placeholder, not literal text: {candidate}")]
    InvalidReplacement { candidate: String },

    /// No span with this id exists in the current suggestion set.
    #[error("unknown span: {id}")]
    UnknownSpan { id: String },
}
