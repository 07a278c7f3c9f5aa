//! Group implementation
//!
//! A group is a named, ordered container of nodes. The node order is the
//! order used when the graph is written back out.

use super::node::Node;
use serde::{Deserialize, Serialize};

/// A named container of nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique name of this group
    pub name: String,

    /// Member nodes in insertion order
    pub nodes: Vec<Node>,
}

impl Group {
    /// Create a new empty group
    pub fn new(name: impl Into<String>) -> Self {
        Group {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Get a member node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get a mutable member node by name
    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Remove a member node, preserving the order of the remaining nodes
    pub fn take_node(&mut self, name: &str) -> Option<Node> {
        let pos = self.nodes.iter().position(|n| n.name == name)?;
        Some(self.nodes.remove(pos))
    }

    /// Names of the member nodes in order
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
