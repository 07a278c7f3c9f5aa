//! Core graph model implementation
//!
//! This module implements the group/node model with:
//! - Groups as named, ordered containers of nodes
//! - Nodes carrying ordered property names
//! - Directed edges labeled with semantics between groups and nodes
//! - One shared namespace for group and node names

pub mod edge;
pub mod group;
pub mod node;
pub mod store;

// Re-export main types
pub use edge::DirectedEdge;
pub use group::Group;
pub use node::Node;
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
