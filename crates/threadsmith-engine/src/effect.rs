//! Effects the orchestrator asks its host to execute.
//!
//! The engine itself performs no I/O. Mutating calls and [`tick`]
//! (`crate::ThreadEditor::tick`) return effects; the host runs each one —
//! checks on a worker so a slow round trip never blocks input, saves
//! against the persistence collaborator — and feeds the result back via
//! `complete_check` / `complete_save`. Correctness never depends on a
//! request actually being aborted: a newer generation simply discards the
//! older result when it lands.

use thiserror::Error;

use threadsmith_core::SegmentId;

/// A side effect for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a check over `content` and report back with the generation.
    Check {
        segment_id: SegmentId,
        content: String,
        generation: u64,
    },
    /// Flush the thread to the persistence collaborator.
    Save { plan: SavePlan },
}

/// Everything one save pass must do, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePlan {
    pub ops: Vec<SaveOp>,
}

impl SavePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// One persistence operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOp {
    /// Create a segment that so far exists only locally. The store assigns
    /// the durable id; `local_id` lets the report map it back.
    CreateSegment {
        local_id: SegmentId,
        content: String,
        index: usize,
    },
    UpdateSegment {
        id: SegmentId,
        content: String,
    },
    DeleteSegment {
        id: SegmentId,
    },
    UpdateThread {
        title: String,
    },
}

/// Failure from the persistence collaborator.
#[derive(Debug, Clone, Error)]
#[error("persistence failure: {message}")]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The persistence collaborator consumed by the save path.
///
/// The engine defines the contract, not the storage schema.
pub trait Persistence {
    fn create_segment(
        &mut self,
        content: &str,
        index: usize,
    ) -> Result<SegmentId, PersistenceError>;
    fn update_segment(&mut self, id: &SegmentId, content: &str) -> Result<(), PersistenceError>;
    fn delete_segment(&mut self, id: &SegmentId) -> Result<(), PersistenceError>;
    fn update_thread(&mut self, title: &str) -> Result<(), PersistenceError>;
}

/// What happened during one save pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Draft-to-durable id assignments from create operations.
    pub assigned_ids: Vec<(SegmentId, SegmentId)>,
    /// Operations that failed. A partial save is still progress: the
    /// in-memory content is authoritative and nothing typed is lost.
    pub failed: usize,
}

impl SaveReport {
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Run a save plan against a persistence collaborator.
///
/// Individual failures are counted and the remaining operations still run
/// (failing one segment's update must not abandon the rest of the thread).
pub fn execute_save(plan: &SavePlan, store: &mut impl Persistence) -> SaveReport {
    let mut report = SaveReport::default();
    for op in &plan.ops {
        let result = match op {
            SaveOp::CreateSegment {
                local_id,
                content,
                index,
            } => match store.create_segment(content, *index) {
                Ok(durable) => {
                    report.assigned_ids.push((local_id.clone(), durable));
                    Ok(())
                }
                Err(error) => Err(error),
            },
            SaveOp::UpdateSegment { id, content } => store.update_segment(id, content),
            SaveOp::DeleteSegment { id } => store.delete_segment(id),
            SaveOp::UpdateThread { title } => store.update_thread(title),
        };
        if let Err(error) = result {
            tracing::warn!(%error, "save operation failed; continuing");
            report.failed += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        created: Vec<(String, usize)>,
        updated: Vec<String>,
        deleted: Vec<String>,
        title: Option<String>,
        fail_updates: bool,
        next_id: u64,
    }

    impl Persistence for RecordingStore {
        fn create_segment(
            &mut self,
            content: &str,
            index: usize,
        ) -> Result<SegmentId, PersistenceError> {
            self.created.push((content.to_string(), index));
            self.next_id += 1;
            Ok(SegmentId::new(format!("stored-{}", self.next_id)))
        }

        fn update_segment(
            &mut self,
            id: &SegmentId,
            _content: &str,
        ) -> Result<(), PersistenceError> {
            if self.fail_updates {
                return Err(PersistenceError::new("update refused"));
            }
            self.updated.push(id.to_string());
            Ok(())
        }

        fn delete_segment(&mut self, id: &SegmentId) -> Result<(), PersistenceError> {
            self.deleted.push(id.to_string());
            Ok(())
        }

        fn update_thread(&mut self, title: &str) -> Result<(), PersistenceError> {
            self.title = Some(title.to_string());
            Ok(())
        }
    }

    fn plan(ops: Vec<SaveOp>) -> SavePlan {
        SavePlan { ops }
    }

    #[test]
    fn create_maps_draft_to_durable_id() {
        let mut store = RecordingStore::default();
        let report = execute_save(
            &plan(vec![SaveOp::CreateSegment {
                local_id: SegmentId::draft(1),
                content: "hi there".into(),
                index: 0,
            }]),
            &mut store,
        );
        assert!(report.success());
        assert_eq!(report.assigned_ids.len(), 1);
        assert_eq!(report.assigned_ids[0].0, SegmentId::draft(1));
        assert_eq!(report.assigned_ids[0].1.as_str(), "stored-1");
    }

    #[test]
    fn failures_are_counted_but_do_not_abort() {
        let mut store = RecordingStore {
            fail_updates: true,
            ..RecordingStore::default()
        };
        let report = execute_save(
            &plan(vec![
                SaveOp::UpdateSegment {
                    id: SegmentId::new("a"),
                    content: "x".into(),
                },
                SaveOp::DeleteSegment {
                    id: SegmentId::new("b"),
                },
            ]),
            &mut store,
        );
        assert!(!report.success());
        assert_eq!(report.failed, 1);
        // The delete after the failed update still ran.
        assert_eq!(store.deleted, vec!["b"]);
    }

    #[test]
    fn update_thread_runs() {
        let mut store = RecordingStore::default();
        let report = execute_save(
            &plan(vec![SaveOp::UpdateThread {
                title: "My thread".into(),
            }]),
            &mut store,
        );
        assert!(report.success());
        assert_eq!(store.title.as_deref(), Some("My thread"));
    }
}
