//! Edit operations and their replay
//!
//! - [`operation`]: the catalog of operation kinds, each mapping onto one
//!   graph store call
//! - [`sequencer`]: deterministic ordering and fail-fast replay of a batch

pub mod operation;
pub mod sequencer;

pub use operation::{MissingParameter, Operation, OperationKind};
pub use sequencer::{
    EditSequencer, OperationDescriptor, PlannedOperation, ReplayError, ReplayResult,
    ReplaySummary,
};
