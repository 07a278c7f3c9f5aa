//! In-memory graph storage implementation
//!
//! The store owns every group, node and edge of a model and is the only place
//! where the model invariants are enforced:
//! - group and node names share one namespace and are unique
//! - edge endpoints name an existing group or node
//! - no two edges share the same (start, end, semantics) triple
//! - every node belongs to exactly one group
//!
//! Every mutator is total: constraint violations come back as a
//! [`GraphError`] and leave the store unchanged.

use super::edge::DirectedEdge;
use super::group::Group;
use super::node::Node;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Name '{0}' is already used by a group or node")]
    NameInUse(String),

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Property '{property}' not found on node '{node}'")]
    PropertyNotFound { node: String, property: String },

    #[error("Invalid edge: '{0}' is neither a group nor a node")]
    UnknownEndpoint(String),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(DirectedEdge),

    #[error("Edge {0} not found")]
    EdgeNotFound(DirectedEdge),

    #[error("Node '{node}' is not a member of group '{group}'")]
    NotAMember { node: String, group: String },

    #[error("Cannot join group '{0}' with itself")]
    SelfJoin(String),

    #[error("Graph index inconsistent: {0}")]
    Inconsistent(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Counts over the current graph contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub groups: usize,
    pub nodes: usize,
    /// Property entries, duplicates counted
    pub properties: usize,
    pub edges: usize,
}

/// In-memory graph storage
///
/// - groups: group name -> Group, in insertion order
/// - edges: edge set in insertion order
/// - membership: node name -> owning group name (O(1) node lookup)
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphStore {
    groups: IndexMap<String, Group>,

    edges: IndexSet<DirectedEdge>,

    #[serde(skip)]
    membership: HashMap<String, String>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Get a group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// All groups in order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Get a node by name, wherever it lives
    pub fn node(&self, name: &str) -> Option<&Node> {
        let owner = self.membership.get(name)?;
        self.groups.get(owner)?.node(name)
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        let owner = self.membership.get(name)?;
        self.groups.get_mut(owner)?.node_mut(name)
    }

    /// Name of the group owning a node
    pub fn group_of(&self, node: &str) -> Option<&str> {
        self.membership.get(node).map(String::as_str)
    }

    /// All edges in order
    pub fn edges(&self) -> impl Iterator<Item = &DirectedEdge> {
        self.edges.iter()
    }

    pub fn has_edge(&self, start: &str, end: &str, semantics: &str) -> bool {
        self.edges.contains(&DirectedEdge::new(start, end, semantics))
    }

    pub fn is_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn is_node(&self, name: &str) -> bool {
        self.membership.contains_key(name)
    }

    /// Check if an edge may point at this name
    pub fn is_referenceable(&self, name: &str) -> bool {
        self.is_group(name) || self.is_node(name)
    }

    /// Group and node names share one namespace
    pub fn is_name_in_use(&self, name: &str) -> bool {
        self.is_referenceable(name)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn node_count(&self) -> usize {
        self.membership.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            groups: self.group_count(),
            nodes: self.node_count(),
            properties: self
                .groups
                .values()
                .flat_map(|g| g.nodes.iter())
                .map(Node::property_count)
                .sum(),
            edges: self.edge_count(),
        }
    }

    fn ensure_unused(&self, name: &str) -> GraphResult<()> {
        if self.is_name_in_use(name) {
            return Err(GraphError::NameInUse(name.to_string()));
        }
        Ok(())
    }

    fn ensure_group(&self, name: &str) -> GraphResult<()> {
        if !self.is_group(name) {
            return Err(GraphError::GroupNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Rebuild the edge set through `rewrite`.
    ///
    /// Rewritten edges that collide with an earlier edge are dropped, so the
    /// first occurrence keeps its position. Returns the number dropped.
    fn rewrite_edges(&mut self, rewrite: impl FnMut(DirectedEdge) -> DirectedEdge) -> usize {
        let before = self.edges.len();
        self.edges = std::mem::take(&mut self.edges)
            .into_iter()
            .map(rewrite)
            .collect();
        before - self.edges.len()
    }

    fn rename_in_edges(&mut self, old: &str, new: &str) -> usize {
        self.rewrite_edges(|edge| edge.with_renamed_endpoint(old, new))
    }

    // ------------------------------------------------------------------
    // Groups and nodes
    // ------------------------------------------------------------------

    /// Append a new empty group
    pub fn add_group(&mut self, name: &str) -> GraphResult<()> {
        self.ensure_unused(name)?;
        self.groups.insert(name.to_string(), Group::new(name));
        Ok(())
    }

    /// Append a new node to the end of a group
    pub fn add_node(&mut self, name: &str, group: &str) -> GraphResult<()> {
        self.ensure_group(group)?;
        self.ensure_unused(name)?;

        let members = self
            .groups
            .get_mut(group)
            .ok_or_else(|| GraphError::GroupNotFound(group.to_string()))?;
        members.nodes.push(Node::new(name));
        self.membership.insert(name.to_string(), group.to_string());
        Ok(())
    }

    /// Remove a node and every edge starting or ending at it.
    ///
    /// The named group has to exist; the node is removed from whichever
    /// group actually owns it.
    pub fn delete_node_and_references(&mut self, group: &str, node: &str) -> GraphResult<()> {
        self.ensure_group(group)?;
        let owner = self
            .membership
            .remove(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;

        if let Some(members) = self.groups.get_mut(&owner) {
            members.take_node(node);
        }
        self.edges.retain(|edge| !edge.references(node));
        Ok(())
    }

    /// Remove a group, all of its nodes, and every edge touching any of them
    pub fn delete_group_and_references(&mut self, group: &str) -> GraphResult<()> {
        let removed = self
            .groups
            .shift_remove(group)
            .ok_or_else(|| GraphError::GroupNotFound(group.to_string()))?;

        let mut gone: HashSet<&str> = removed.node_names().collect();
        for name in &gone {
            self.membership.remove(*name);
        }
        gone.insert(group);

        self.edges
            .retain(|edge| !gone.contains(edge.start.as_str()) && !gone.contains(edge.end.as_str()));
        Ok(())
    }

    /// Rename a node and rewrite every edge endpoint that referenced it
    pub fn rename_node_and_references(&mut self, old: &str, new: &str) -> GraphResult<()> {
        self.ensure_unused(new)?;
        let owner = self
            .membership
            .remove(old)
            .ok_or_else(|| GraphError::NodeNotFound(old.to_string()))?;

        if let Some(node) = self.groups.get_mut(&owner).and_then(|g| g.node_mut(old)) {
            node.name = new.to_string();
        }
        self.membership.insert(new.to_string(), owner);
        self.rename_in_edges(old, new);
        Ok(())
    }

    /// Rename a group in place and rewrite every edge endpoint that referenced it
    pub fn rename_group_and_references(&mut self, old: &str, new: &str) -> GraphResult<()> {
        self.ensure_unused(new)?;
        self.ensure_group(old)?;

        self.groups = std::mem::take(&mut self.groups)
            .into_iter()
            .map(|(name, mut group)| {
                if name == old {
                    group.name = new.to_string();
                    (new.to_string(), group)
                } else {
                    (name, group)
                }
            })
            .collect();

        for owner in self.membership.values_mut() {
            if owner == old {
                *owner = new.to_string();
            }
        }
        self.rename_in_edges(old, new);
        Ok(())
    }

    /// Move a node from one group to the end of another
    pub fn move_node_to_other_group(&mut self, node: &str, from: &str, to: &str) -> GraphResult<()> {
        self.ensure_group(from)?;
        self.ensure_group(to)?;
        match self.membership.get(node) {
            None => return Err(GraphError::NodeNotFound(node.to_string())),
            Some(owner) if owner.as_str() != from => {
                return Err(GraphError::NotAMember {
                    node: node.to_string(),
                    group: from.to_string(),
                })
            }
            Some(_) => {}
        }

        let moved = self
            .groups
            .get_mut(from)
            .and_then(|g| g.take_node(node))
            .ok_or_else(|| GraphError::NotAMember {
                node: node.to_string(),
                group: from.to_string(),
            })?;
        self.groups
            .get_mut(to)
            .ok_or_else(|| GraphError::GroupNotFound(to.to_string()))?
            .nodes
            .push(moved);
        self.membership.insert(node.to_string(), to.to_string());
        Ok(())
    }

    /// Replace two groups by a new group holding the first group's nodes
    /// followed by the second group's nodes.
    ///
    /// `new` may reuse either old name. The joined group is appended after
    /// all remaining groups.
    pub fn join_groups(&mut self, first: &str, second: &str, new: &str) -> GraphResult<()> {
        if new != first && new != second {
            self.ensure_unused(new)?;
        }
        self.ensure_group(first)?;
        self.ensure_group(second)?;
        if first == second {
            return Err(GraphError::SelfJoin(first.to_string()));
        }

        let first_group = self
            .groups
            .shift_remove(first)
            .ok_or_else(|| GraphError::GroupNotFound(first.to_string()))?;
        let second_group = self
            .groups
            .shift_remove(second)
            .ok_or_else(|| GraphError::GroupNotFound(second.to_string()))?;

        let mut joined = Group::new(new);
        joined.nodes = first_group.nodes;
        joined.nodes.extend(second_group.nodes);
        for node in &joined.nodes {
            self.membership.insert(node.name.clone(), new.to_string());
        }
        self.groups.insert(new.to_string(), joined);

        self.rewrite_edges(|edge| {
            edge.with_renamed_endpoint(first, new)
                .with_renamed_endpoint(second, new)
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Append a property to a node (duplicates allowed)
    pub fn add_property(&mut self, node: &str, property: &str) -> GraphResult<()> {
        self.node_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?
            .add_property(property);
        Ok(())
    }

    /// Remove every occurrence of a property from a node
    pub fn delete_property(&mut self, node: &str, property: &str) -> GraphResult<()> {
        let target = self
            .node_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        if target.remove_property(property) == 0 {
            return Err(GraphError::PropertyNotFound {
                node: node.to_string(),
                property: property.to_string(),
            });
        }
        Ok(())
    }

    /// Rename every occurrence of a property on a node
    pub fn update_property(&mut self, node: &str, old: &str, new: &str) -> GraphResult<()> {
        let target = self
            .node_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        if target.rename_property(old, new) == 0 {
            return Err(GraphError::PropertyNotFound {
                node: node.to_string(),
                property: old.to_string(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Append a new edge between two existing groups or nodes
    pub fn add_directed_edge(&mut self, start: &str, end: &str, semantics: &str) -> GraphResult<()> {
        let edge = DirectedEdge::new(start, end, semantics);
        if self.edges.contains(&edge) {
            return Err(GraphError::EdgeAlreadyExists(edge));
        }
        for endpoint in [start, end] {
            if !self.is_referenceable(endpoint) {
                return Err(GraphError::UnknownEndpoint(endpoint.to_string()));
            }
        }
        self.edges.insert(edge);
        Ok(())
    }

    /// Remove the edge with exactly this triple
    pub fn delete_directed_edge(&mut self, start: &str, end: &str, semantics: &str) -> GraphResult<()> {
        let edge = DirectedEdge::new(start, end, semantics);
        if !self.edges.shift_remove(&edge) {
            return Err(GraphError::EdgeNotFound(edge));
        }
        Ok(())
    }

    /// Relabel an edge in place
    pub fn change_semantics_directed_edge(
        &mut self,
        start: &str,
        end: &str,
        old: &str,
        new: &str,
    ) -> GraphResult<()> {
        let current = DirectedEdge::new(start, end, old);
        if !self.edges.contains(&current) {
            return Err(GraphError::EdgeNotFound(current));
        }
        if old == new {
            return Ok(());
        }
        let replacement = DirectedEdge::new(start, end, new);
        if self.edges.contains(&replacement) {
            return Err(GraphError::EdgeAlreadyExists(replacement));
        }

        self.rewrite_edges(|edge| {
            if edge == current {
                replacement.clone()
            } else {
                edge
            }
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Integrity
    // ------------------------------------------------------------------

    /// Check every model invariant and the internal node index
    pub fn verify_integrity(&self) -> GraphResult<()> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut node_total = 0;

        for (key, group) in &self.groups {
            if key != &group.name {
                return Err(GraphError::Inconsistent(format!(
                    "group '{}' is stored under key '{}'",
                    group.name, key
                )));
            }
            if !names.insert(group.name.as_str()) {
                return Err(GraphError::NameInUse(group.name.clone()));
            }
            for node in &group.nodes {
                if !names.insert(node.name.as_str()) {
                    return Err(GraphError::NameInUse(node.name.clone()));
                }
                if self.membership.get(&node.name) != Some(&group.name) {
                    return Err(GraphError::Inconsistent(format!(
                        "node '{}' is not indexed under group '{}'",
                        node.name, group.name
                    )));
                }
                node_total += 1;
            }
        }

        if node_total != self.membership.len() {
            return Err(GraphError::Inconsistent(format!(
                "{} nodes stored but {} indexed",
                node_total,
                self.membership.len()
            )));
        }

        for edge in &self.edges {
            for endpoint in [&edge.start, &edge.end] {
                if !names.contains(endpoint.as_str()) {
                    return Err(GraphError::UnknownEndpoint(endpoint.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_names(store: &GraphStore, group: &str) -> Vec<String> {
        store
            .group(group)
            .unwrap()
            .node_names()
            .map(str::to_string)
            .collect()
    }

    fn edge_list(store: &GraphStore) -> Vec<String> {
        store.edges().map(|e| e.to_string()).collect()
    }

    /// Two groups, three nodes, edges touching nodes and groups
    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_group("UI").unwrap();
        store.add_group("Core").unwrap();
        store.add_node("Button", "UI").unwrap();
        store.add_node("Label", "UI").unwrap();
        store.add_node("Engine", "Core").unwrap();
        store.add_property("Button", "onClick").unwrap();
        store.add_directed_edge("Button", "Label", "triggers").unwrap();
        store.add_directed_edge("Button", "Engine", "calls").unwrap();
        store.add_directed_edge("UI", "Core", "depends").unwrap();
        store
    }

    #[test]
    fn test_add_group_and_node() {
        let store = sample_store();
        assert_eq!(store.group_count(), 2);
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 3);
        assert_eq!(store.group_of("Engine"), Some("Core"));
        assert_eq!(node_names(&store, "UI"), vec!["Button", "Label"]);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_names_are_unique_across_groups_and_nodes() {
        let mut store = sample_store();
        for name in ["UI", "Button"] {
            assert_eq!(
                store.add_group(name),
                Err(GraphError::NameInUse(name.to_string()))
            );
            assert_eq!(
                store.add_node(name, "Core"),
                Err(GraphError::NameInUse(name.to_string()))
            );
        }
        assert_eq!(store.group_count(), 2);
        assert_eq!(store.node_count(), 3);
    }

    #[test]
    fn test_add_node_to_missing_group() {
        let mut store = GraphStore::new();
        assert_eq!(
            store.add_node("Button", "UI"),
            Err(GraphError::GroupNotFound("UI".to_string()))
        );
    }

    #[test]
    fn test_edge_requires_existing_endpoints() {
        let mut store = sample_store();
        assert_eq!(
            store.add_directed_edge("Ghost", "Label", "x"),
            Err(GraphError::UnknownEndpoint("Ghost".to_string()))
        );
        assert_eq!(
            store.add_directed_edge("Label", "Ghost", "x"),
            Err(GraphError::UnknownEndpoint("Ghost".to_string()))
        );
        assert_eq!(store.edge_count(), 3);
    }

    #[test]
    fn test_duplicate_edge_rejected_but_other_semantics_allowed() {
        let mut store = sample_store();
        assert!(matches!(
            store.add_directed_edge("Button", "Label", "triggers"),
            Err(GraphError::EdgeAlreadyExists(_))
        ));
        store.add_directed_edge("Button", "Label", "updates").unwrap();
        assert!(store.has_edge("Button", "Label", "triggers"));
        assert!(store.has_edge("Button", "Label", "updates"));
    }

    #[test]
    fn test_delete_edge() {
        let mut store = sample_store();
        store.delete_directed_edge("Button", "Label", "triggers").unwrap();
        assert!(!store.has_edge("Button", "Label", "triggers"));
        assert!(matches!(
            store.delete_directed_edge("Button", "Label", "triggers"),
            Err(GraphError::EdgeNotFound(_))
        ));
        assert_eq!(edge_list(&store), vec!["Button -> Engine: calls", "UI -> Core: depends"]);
    }

    #[test]
    fn test_property_operations() {
        let mut store = sample_store();
        store.add_property("Button", "onHover").unwrap();
        store.add_property("Button", "onClick").unwrap();
        assert_eq!(
            store.node("Button").unwrap().properties,
            vec!["onClick", "onHover", "onClick"]
        );

        store.update_property("Button", "onClick", "onPress").unwrap();
        assert_eq!(
            store.node("Button").unwrap().properties,
            vec!["onPress", "onHover", "onPress"]
        );

        store.delete_property("Button", "onPress").unwrap();
        assert_eq!(store.node("Button").unwrap().properties, vec!["onHover"]);

        assert_eq!(
            store.delete_property("Button", "onPress"),
            Err(GraphError::PropertyNotFound {
                node: "Button".to_string(),
                property: "onPress".to_string()
            })
        );
        assert!(matches!(
            store.update_property("Button", "missing", "x"),
            Err(GraphError::PropertyNotFound { .. })
        ));
        assert_eq!(
            store.add_property("Ghost", "x"),
            Err(GraphError::NodeNotFound("Ghost".to_string()))
        );
    }

    #[test]
    fn test_delete_node_cascades_edges() {
        let mut store = sample_store();
        store.delete_node_and_references("UI", "Button").unwrap();

        assert!(!store.is_node("Button"));
        assert!(store.edges().all(|e| !e.references("Button")));
        assert_eq!(edge_list(&store), vec!["UI -> Core: depends"]);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_delete_node_failures() {
        let mut store = sample_store();
        assert_eq!(
            store.delete_node_and_references("Nowhere", "Button"),
            Err(GraphError::GroupNotFound("Nowhere".to_string()))
        );
        assert_eq!(
            store.delete_node_and_references("UI", "Ghost"),
            Err(GraphError::NodeNotFound("Ghost".to_string()))
        );
    }

    #[test]
    fn test_delete_node_named_group_need_not_own_it() {
        let mut store = sample_store();
        store.delete_node_and_references("UI", "Engine").unwrap();
        assert!(store.group("Core").unwrap().is_empty());
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_delete_group_cascades_nodes_and_edges() {
        let mut store = sample_store();
        store.add_group("Extra").unwrap();
        store.add_directed_edge("Extra", "Engine", "wraps").unwrap();

        store.delete_group_and_references("UI").unwrap();

        assert!(!store.is_group("UI"));
        assert!(!store.is_node("Button"));
        assert!(!store.is_node("Label"));
        assert_eq!(edge_list(&store), vec!["Extra -> Engine: wraps"]);
        assert_eq!(
            store.groups().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            vec!["Core", "Extra"]
        );
        store.verify_integrity().unwrap();

        assert_eq!(
            store.delete_group_and_references("UI"),
            Err(GraphError::GroupNotFound("UI".to_string()))
        );
    }

    #[test]
    fn test_rename_node_propagates_to_edges() {
        let mut store = sample_store();
        store.rename_node_and_references("Button", "Btn").unwrap();

        assert!(!store.is_node("Button"));
        assert_eq!(store.group_of("Btn"), Some("UI"));
        assert_eq!(node_names(&store, "UI"), vec!["Btn", "Label"]);
        assert_eq!(store.node("Btn").unwrap().properties, vec!["onClick"]);
        assert!(store.edges().all(|e| !e.references("Button")));
        assert!(store.has_edge("Btn", "Label", "triggers"));
        assert!(store.has_edge("Btn", "Engine", "calls"));
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_rename_node_failures() {
        let mut store = sample_store();
        assert_eq!(
            store.rename_node_and_references("Button", "Label"),
            Err(GraphError::NameInUse("Label".to_string()))
        );
        assert_eq!(
            store.rename_node_and_references("UI", "Frontend"),
            Err(GraphError::NodeNotFound("UI".to_string()))
        );
    }

    #[test]
    fn test_rename_group_keeps_position() {
        let mut store = sample_store();
        store.rename_group_and_references("UI", "Frontend").unwrap();

        assert_eq!(
            store.groups().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            vec!["Frontend", "Core"]
        );
        assert_eq!(store.group_of("Button"), Some("Frontend"));
        assert!(store.has_edge("Frontend", "Core", "depends"));
        store.verify_integrity().unwrap();

        assert_eq!(
            store.rename_group_and_references("Button", "X"),
            Err(GraphError::GroupNotFound("Button".to_string()))
        );
        assert_eq!(
            store.rename_group_and_references("Core", "Label"),
            Err(GraphError::NameInUse("Label".to_string()))
        );
    }

    #[test]
    fn test_move_node_to_other_group() {
        let mut store = sample_store();
        store.move_node_to_other_group("Button", "UI", "Core").unwrap();

        assert_eq!(node_names(&store, "UI"), vec!["Label"]);
        assert_eq!(node_names(&store, "Core"), vec!["Engine", "Button"]);
        assert_eq!(store.group_of("Button"), Some("Core"));
        assert_eq!(store.edge_count(), 3);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_move_node_failures() {
        let mut store = sample_store();
        assert_eq!(
            store.move_node_to_other_group("Button", "Nowhere", "Core"),
            Err(GraphError::GroupNotFound("Nowhere".to_string()))
        );
        assert_eq!(
            store.move_node_to_other_group("Button", "UI", "Nowhere"),
            Err(GraphError::GroupNotFound("Nowhere".to_string()))
        );
        assert_eq!(
            store.move_node_to_other_group("Ghost", "UI", "Core"),
            Err(GraphError::NodeNotFound("Ghost".to_string()))
        );
        assert_eq!(
            store.move_node_to_other_group("Engine", "UI", "Core"),
            Err(GraphError::NotAMember {
                node: "Engine".to_string(),
                group: "UI".to_string()
            })
        );
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_join_groups_orders_nodes_and_rewrites_edges() {
        let mut store = sample_store();
        store.add_group("Extra").unwrap();
        store.join_groups("UI", "Core", "App").unwrap();

        assert!(!store.is_group("UI"));
        assert!(!store.is_group("Core"));
        assert_eq!(node_names(&store, "App"), vec!["Button", "Label", "Engine"]);
        assert_eq!(
            store.groups().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            vec!["Extra", "App"]
        );
        assert!(store.has_edge("App", "App", "depends"));
        assert_eq!(store.group_of("Engine"), Some("App"));
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_join_groups_may_reuse_a_source_name() {
        let mut store = sample_store();
        store.join_groups("UI", "Core", "Core").unwrap();
        assert_eq!(node_names(&store, "Core"), vec!["Button", "Label", "Engine"]);
        assert_eq!(store.group_count(), 1);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_join_groups_merges_colliding_edges() {
        let mut store = sample_store();
        store.add_group("Extra").unwrap();
        store.add_directed_edge("Extra", "Core", "depends").unwrap();

        store.join_groups("UI", "Extra", "Front").unwrap();

        let depends: Vec<_> = store
            .edges()
            .filter(|e| e.semantics == "depends")
            .collect();
        assert_eq!(depends.len(), 1);
        assert_eq!(depends[0].start, "Front");
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_join_groups_failures() {
        let mut store = sample_store();
        assert_eq!(
            store.join_groups("UI", "Core", "Button"),
            Err(GraphError::NameInUse("Button".to_string()))
        );
        assert_eq!(
            store.join_groups("UI", "Nowhere", "App"),
            Err(GraphError::GroupNotFound("Nowhere".to_string()))
        );
        assert_eq!(
            store.join_groups("UI", "UI", "App"),
            Err(GraphError::SelfJoin("UI".to_string()))
        );
        assert_eq!(store.group_count(), 2);
    }

    #[test]
    fn test_change_semantics_keeps_position() {
        let mut store = sample_store();
        store
            .change_semantics_directed_edge("Button", "Engine", "calls", "invokes")
            .unwrap();
        assert_eq!(
            edge_list(&store),
            vec![
                "Button -> Label: triggers",
                "Button -> Engine: invokes",
                "UI -> Core: depends"
            ]
        );

        store
            .change_semantics_directed_edge("Button", "Engine", "invokes", "invokes")
            .unwrap();
        assert_eq!(store.edge_count(), 3);
    }

    #[test]
    fn test_change_semantics_failures() {
        let mut store = sample_store();
        store.add_directed_edge("Button", "Label", "updates").unwrap();
        assert!(matches!(
            store.change_semantics_directed_edge("Button", "Label", "missing", "x"),
            Err(GraphError::EdgeNotFound(_))
        ));
        assert!(matches!(
            store.change_semantics_directed_edge("Button", "Label", "triggers", "updates"),
            Err(GraphError::EdgeAlreadyExists(_))
        ));
    }

    #[test]
    fn test_statistics() {
        let store = sample_store();
        assert_eq!(
            store.statistics(),
            GraphStatistics {
                groups: 2,
                nodes: 3,
                properties: 1,
                edges: 3
            }
        );
    }
}
