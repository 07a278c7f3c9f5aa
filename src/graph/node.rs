//! Node implementation for the group/node graph model
//!
//! A node is a named vertex carrying an ordered list of property names.
//! Property names are plain tokens; the list may contain the same name twice.

use serde::{Deserialize, Serialize};

/// A node in the graph
///
/// Nodes have:
/// - A name, unique across all groups and nodes of the graph
/// - An ordered sequence of property names (duplicates allowed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique name of this node
    pub name: String,

    /// Property names in insertion order
    pub properties: Vec<String>,
}

impl Node {
    /// Create a new node without properties
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property name
    pub fn add_property(&mut self, property: impl Into<String>) {
        self.properties.push(property.into());
    }

    /// Remove every occurrence of a property, returning how many were removed
    pub fn remove_property(&mut self, property: &str) -> usize {
        let before = self.properties.len();
        self.properties.retain(|p| p != property);
        before - self.properties.len()
    }

    /// Rename every occurrence of a property in place, returning how many were renamed
    pub fn rename_property(&mut self, old: &str, new: &str) -> usize {
        let mut renamed = 0;
        for property in self.properties.iter_mut().filter(|p| *p == old) {
            *property = new.to_string();
            renamed += 1;
        }
        renamed
    }

    /// Get the number of property entries (duplicates counted)
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}
