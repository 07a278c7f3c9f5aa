//! Directed edge implementation
//!
//! Edges reference their endpoints by name. An endpoint may be a group or a
//! node. Two edges are the same edge exactly when start, end and semantics
//! all match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantically labeled directed edge
///
/// Edges have:
/// - A start name (edge goes FROM this group or node)
/// - An end name
/// - A semantics label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectedEdge {
    /// Name of the start group or node
    pub start: String,

    /// Name of the end group or node
    pub end: String,

    /// Label describing the relation (e.g. "triggers")
    pub semantics: String,
}

impl DirectedEdge {
    /// Create a new directed edge
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        semantics: impl Into<String>,
    ) -> Self {
        DirectedEdge {
            start: start.into(),
            end: end.into(),
            semantics: semantics.into(),
        }
    }

    /// Check if either endpoint equals the given name
    pub fn references(&self, name: &str) -> bool {
        self.start == name || self.end == name
    }

    /// Consume the edge and rewrite every endpoint equal to `old` as `new`
    pub fn with_renamed_endpoint(mut self, old: &str, new: &str) -> Self {
        if self.start == old {
            self.start = new.to_string();
        }
        if self.end == old {
            self.end = new.to_string();
        }
        self
    }
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.start, self.end, self.semantics)
    }
}
