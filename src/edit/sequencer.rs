//! Edit sequencer
//!
//! Orders a flat stream of operations by (semantic edit index, operation
//! index), both compared as integers, and replays them one at a time against
//! a single [`GraphStore`]. The first failing operation aborts the replay;
//! nothing applied before it is rolled back.

use super::operation::Operation;
use crate::graph::{GraphError, GraphStore};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error, info};

/// Replay errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// Two operations claim the same position
    #[error("Duplicate operation index {index} in semantic edit {semantic_edit}")]
    DuplicateOperation { semantic_edit: i64, index: i64 },

    /// An operation was rejected by the graph store; the batch is aborted
    #[error("Operation {index} of semantic edit {semantic_edit} failed: {operation}: {source}")]
    OperationFailed {
        semantic_edit: i64,
        index: i64,
        operation: Operation,
        #[source]
        source: GraphError,
    },
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// An operation tagged with its position in the edit batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    pub semantic_edit: i64,
    pub index: i64,
    pub operation: Operation,
}

impl OperationDescriptor {
    pub fn new(semantic_edit: i64, index: i64, operation: Operation) -> Self {
        Self {
            semantic_edit,
            index,
            operation,
        }
    }
}

/// One step of the replay order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedOperation<'a> {
    /// Zero-based position in the total order
    pub step: usize,
    pub semantic_edit: i64,
    pub index: i64,
    pub operation: &'a Operation,
}

/// Outcome of a completed replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub semantic_edits: usize,
    pub operations: usize,
}

/// Ordered batch of semantic edits
#[derive(Debug, Clone, Default)]
pub struct EditSequencer {
    edits: BTreeMap<i64, BTreeMap<i64, Operation>>,
}

impl EditSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequencer from descriptors in any order
    pub fn from_descriptors<I>(descriptors: I) -> ReplayResult<Self>
    where
        I: IntoIterator<Item = OperationDescriptor>,
    {
        let mut sequencer = Self::new();
        for descriptor in descriptors {
            sequencer.push(descriptor)?;
        }
        Ok(sequencer)
    }

    /// Add an operation at its (semantic edit, index) position
    pub fn push(&mut self, descriptor: OperationDescriptor) -> ReplayResult<()> {
        let OperationDescriptor {
            semantic_edit,
            index,
            operation,
        } = descriptor;

        let edit = self.edits.entry(semantic_edit).or_default();
        if edit.contains_key(&index) {
            return Err(ReplayError::DuplicateOperation {
                semantic_edit,
                index,
            });
        }
        edit.insert(index, operation);
        Ok(())
    }

    /// Number of operations in the batch
    pub fn len(&self) -> usize {
        self.edits.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn semantic_edit_count(&self) -> usize {
        self.edits.len()
    }

    /// The total replay order
    pub fn plan(&self) -> impl Iterator<Item = PlannedOperation<'_>> {
        self.edits
            .iter()
            .flat_map(|(&semantic_edit, ops)| {
                ops.iter().map(move |(&index, operation)| (semantic_edit, index, operation))
            })
            .enumerate()
            .map(|(step, (semantic_edit, index, operation))| PlannedOperation {
                step,
                semantic_edit,
                index,
                operation,
            })
    }

    /// Apply every operation in order, stopping at the first failure
    pub fn replay(&self, store: &mut GraphStore) -> ReplayResult<ReplaySummary> {
        let mut applied = 0;

        for planned in self.plan() {
            debug!(
                "Applying semantic edit {} operation {}: {}",
                planned.semantic_edit, planned.index, planned.operation
            );

            if let Err(source) = planned.operation.apply(store) {
                error!(
                    semantic_edit = planned.semantic_edit,
                    operation_index = planned.index,
                    "Could not apply operation {}: {}",
                    planned.operation,
                    source
                );
                return Err(ReplayError::OperationFailed {
                    semantic_edit: planned.semantic_edit,
                    index: planned.index,
                    operation: planned.operation.clone(),
                    source,
                });
            }
            applied += 1;
        }

        info!(
            "Replayed {} operations from {} semantic edits",
            applied,
            self.edits.len()
        );
        Ok(ReplaySummary {
            semantic_edits: self.edits.len(),
            operations: applied,
        })
    }
}
