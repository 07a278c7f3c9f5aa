//! Evolv
//!
//! A graph model of groups, nodes and semantically labelled directed edges,
//! evolved by replaying batches of semantic edits read from XML.
//!
//! # Modules
//!
//! - [`graph`]: the in-memory model and every mutation that keeps it consistent
//! - [`edit`]: the operation catalog and the sequencer that replays it in order
//! - [`document`]: XML loading, operation reading, template serialization, schema checks
//! - [`puml`]: PlantUML export
//! - [`replay`]: file-level pipelines used by the command line tool
//!
//! ## Example Usage
//!
//! ```rust
//! use evolv::edit::{EditSequencer, Operation, OperationDescriptor};
//! use evolv::graph::GraphStore;
//!
//! let mut store = GraphStore::new();
//! store.add_group("UI").unwrap();
//! store.add_node("Button", "UI").unwrap();
//!
//! let mut sequencer = EditSequencer::new();
//! sequencer
//!     .push(OperationDescriptor::new(
//!         0,
//!         0,
//!         Operation::RenameNode {
//!             old_node_name: "Button".to_string(),
//!             new_node_name: "Btn".to_string(),
//!         },
//!     ))
//!     .unwrap();
//! sequencer.replay(&mut store).unwrap();
//!
//! assert!(store.is_node("Btn"));
//! assert!(!store.is_node("Button"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod edit;
pub mod error;
pub mod graph;
pub mod puml;
pub mod replay;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, ReplayConfig};

pub use document::{
    load_graph, read_operations, read_sequencer, write_graph, DocumentError, DocumentResult,
    Schema, SchemaReport,
};

pub use edit::{
    EditSequencer, Operation, OperationDescriptor, OperationKind, ReplayError, ReplayResult,
    ReplaySummary,
};

pub use error::{EvolvError, EvolvResult};

pub use graph::{DirectedEdge, GraphError, GraphResult, GraphStatistics, GraphStore, Group, Node};

pub use puml::render_puml;

pub use replay::{export_puml, run, PumlReport, ReplayInputs, ReplayReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
