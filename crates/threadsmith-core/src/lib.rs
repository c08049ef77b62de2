#![forbid(unsafe_code)]

//! Core data model and pure algorithms for threadsmith.
//!
//! This crate has no I/O. It defines the flagged-region [`Span`] type, the
//! tweet-sized [`Segment`], the display-oriented [`GroupedSpan`] aggregation,
//! Twitter-weighted character counting, and the right-to-left batch editor
//! that applies replacements without corrupting the offsets of spans still
//! to be processed.
//!
//! Everything here operates on **character offsets** (Unicode scalar
//! values). Byte ranges exist only inside [`edit`], at the point where a
//! replacement is actually spliced into a `String`.

pub mod charcount;
pub mod edit;
pub mod group;
pub mod segment;
pub mod span;

pub use charcount::weighted_len;
pub use edit::{BatchOutcome, apply_best_candidates, apply_replacement};
pub use group::{GroupedSpan, group_spelling};
pub use segment::{DRAFT_PREFIX, Segment, SegmentId};
pub use span::{Span, SpanId, SpanKind, is_placeholder};
