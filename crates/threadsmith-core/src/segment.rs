//! Tweet-sized text segments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::charcount::weighted_len;

/// Prefix for ids of segments created locally and not yet persisted.
///
/// The save planner creates these remotely and swaps in the store-assigned
/// id; everything else is an update.
pub const DRAFT_PREFIX: &str = "draft-";

/// Identifier of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A locally generated id for a segment that has no store identity yet.
    #[must_use]
    pub fn draft(counter: u64) -> Self {
        Self(format!("{DRAFT_PREFIX}{counter}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this segment exists only locally.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.0.starts_with(DRAFT_PREFIX)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of text in a thread (one outgoing tweet).
///
/// `char_count` is the Twitter-weighted length of `content`, recomputed on
/// every mutation; it is never the raw code-unit length. `index` is the
/// zero-based position within the thread and is kept contiguous by the
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub content: String,
    pub char_count: usize,
    pub index: usize,
}

impl Segment {
    /// Create an empty segment at `index`.
    #[must_use]
    pub fn empty(id: SegmentId, index: usize) -> Self {
        Self {
            id,
            content: String::new(),
            char_count: 0,
            index,
        }
    }

    /// Create a segment from persisted content.
    #[must_use]
    pub fn from_content(id: SegmentId, content: impl Into<String>, index: usize) -> Self {
        let content = content.into();
        let char_count = weighted_len(&content);
        Self {
            id,
            content,
            char_count,
            index,
        }
    }

    /// Replace the content, recomputing the weighted count.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.char_count = weighted_len(&self.content);
    }
}
