//! Operation catalog
//!
//! The closed set of edit operation kinds. Each kind declares the named
//! parameters it reads and maps onto exactly one [`GraphStore`] call. No
//! validation happens here beyond extracting parameters; the store decides
//! whether an operation is allowed.

use crate::graph::{GraphResult, GraphStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A parameter required by an operation kind was not supplied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} requires parameter '{parameter}'")]
pub struct MissingParameter {
    pub kind: OperationKind,
    pub parameter: &'static str,
}

/// The kinds of edit operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    AddGroup,
    DeleteGroup,
    RenameGroup,
    AddNode,
    DeleteNode,
    RenameNode,
    AddProperty,
    DeleteProperty,
    RenameProperty,
    AddDirectedEdge,
    DeleteDirectedEdge,
    ChangeSemanticsDirectedEdge,
    MoveNodeToOtherGroup,
    JoinGroups,
}

impl OperationKind {
    pub const ALL: [OperationKind; 14] = [
        OperationKind::AddGroup,
        OperationKind::DeleteGroup,
        OperationKind::RenameGroup,
        OperationKind::AddNode,
        OperationKind::DeleteNode,
        OperationKind::RenameNode,
        OperationKind::AddProperty,
        OperationKind::DeleteProperty,
        OperationKind::RenameProperty,
        OperationKind::AddDirectedEdge,
        OperationKind::DeleteDirectedEdge,
        OperationKind::ChangeSemanticsDirectedEdge,
        OperationKind::MoveNodeToOtherGroup,
        OperationKind::JoinGroups,
    ];

    /// Element name used in operations documents
    pub fn tag(&self) -> &'static str {
        match self {
            OperationKind::AddGroup => "AddGroup",
            OperationKind::DeleteGroup => "DeleteGroup",
            OperationKind::RenameGroup => "RenameGroup",
            OperationKind::AddNode => "AddNode",
            OperationKind::DeleteNode => "DeleteNode",
            OperationKind::RenameNode => "RenameNode",
            OperationKind::AddProperty => "AddProperty",
            OperationKind::DeleteProperty => "DeleteProperty",
            OperationKind::RenameProperty => "RenameProperty",
            OperationKind::AddDirectedEdge => "AddDirectedEdge",
            OperationKind::DeleteDirectedEdge => "DeleteDirectedEdge",
            OperationKind::ChangeSemanticsDirectedEdge => "ChangeSemanticsDirectedEdge",
            OperationKind::MoveNodeToOtherGroup => "MoveNodeToOtherGroup",
            OperationKind::JoinGroups => "JoinGroups",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Parameter names in the order the operation passes them to the store
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            OperationKind::AddGroup | OperationKind::DeleteGroup => &["groupName"],
            OperationKind::RenameGroup => &["oldGroupName", "newGroupName"],
            OperationKind::AddNode | OperationKind::DeleteNode => &["nodeName", "groupName"],
            OperationKind::RenameNode => &["oldNodeName", "newNodeName"],
            OperationKind::AddProperty | OperationKind::DeleteProperty => {
                &["nodeName", "propertyName"]
            }
            OperationKind::RenameProperty => {
                &["nodeName", "oldPropertyName", "newPropertyName"]
            }
            OperationKind::AddDirectedEdge | OperationKind::DeleteDirectedEdge => {
                &["start", "end", "semantics"]
            }
            OperationKind::ChangeSemanticsDirectedEdge => {
                &["start", "end", "oldSemantics", "newSemantics"]
            }
            OperationKind::MoveNodeToOtherGroup => {
                &["nodeName", "oldGroupName", "newGroupName"]
            }
            OperationKind::JoinGroups => &["group1Name", "group2Name", "newGroupName"],
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single typed edit operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Operation {
    AddGroup {
        group_name: String,
    },
    DeleteGroup {
        group_name: String,
    },
    RenameGroup {
        old_group_name: String,
        new_group_name: String,
    },
    AddNode {
        node_name: String,
        group_name: String,
    },
    DeleteNode {
        node_name: String,
        group_name: String,
    },
    RenameNode {
        old_node_name: String,
        new_node_name: String,
    },
    AddProperty {
        node_name: String,
        property_name: String,
    },
    DeleteProperty {
        node_name: String,
        property_name: String,
    },
    RenameProperty {
        node_name: String,
        old_property_name: String,
        new_property_name: String,
    },
    AddDirectedEdge {
        start: String,
        end: String,
        semantics: String,
    },
    DeleteDirectedEdge {
        start: String,
        end: String,
        semantics: String,
    },
    ChangeSemanticsDirectedEdge {
        start: String,
        end: String,
        old_semantics: String,
        new_semantics: String,
    },
    MoveNodeToOtherGroup {
        node_name: String,
        old_group_name: String,
        new_group_name: String,
    },
    JoinGroups {
        group1_name: String,
        group2_name: String,
        new_group_name: String,
    },
}

impl Operation {
    /// Build an operation from named parameters.
    ///
    /// `lookup` is asked for each name in [`OperationKind::parameters`].
    pub fn from_parameters<'a, F>(kind: OperationKind, lookup: F) -> Result<Self, MissingParameter>
    where
        F: Fn(&'static str) -> Option<&'a str>,
    {
        let mut values = Vec::with_capacity(kind.parameters().len());
        for &parameter in kind.parameters() {
            let value = lookup(parameter).ok_or(MissingParameter { kind, parameter })?;
            values.push(value.to_string());
        }
        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();

        Ok(match kind {
            OperationKind::AddGroup => Operation::AddGroup { group_name: next() },
            OperationKind::DeleteGroup => Operation::DeleteGroup { group_name: next() },
            OperationKind::RenameGroup => Operation::RenameGroup {
                old_group_name: next(),
                new_group_name: next(),
            },
            OperationKind::AddNode => Operation::AddNode {
                node_name: next(),
                group_name: next(),
            },
            OperationKind::DeleteNode => Operation::DeleteNode {
                node_name: next(),
                group_name: next(),
            },
            OperationKind::RenameNode => Operation::RenameNode {
                old_node_name: next(),
                new_node_name: next(),
            },
            OperationKind::AddProperty => Operation::AddProperty {
                node_name: next(),
                property_name: next(),
            },
            OperationKind::DeleteProperty => Operation::DeleteProperty {
                node_name: next(),
                property_name: next(),
            },
            OperationKind::RenameProperty => Operation::RenameProperty {
                node_name: next(),
                old_property_name: next(),
                new_property_name: next(),
            },
            OperationKind::AddDirectedEdge => Operation::AddDirectedEdge {
                start: next(),
                end: next(),
                semantics: next(),
            },
            OperationKind::DeleteDirectedEdge => Operation::DeleteDirectedEdge {
                start: next(),
                end: next(),
                semantics: next(),
            },
            OperationKind::ChangeSemanticsDirectedEdge => Operation::ChangeSemanticsDirectedEdge {
                start: next(),
                end: next(),
                old_semantics: next(),
                new_semantics: next(),
            },
            OperationKind::MoveNodeToOtherGroup => Operation::MoveNodeToOtherGroup {
                node_name: next(),
                old_group_name: next(),
                new_group_name: next(),
            },
            OperationKind::JoinGroups => Operation::JoinGroups {
                group1_name: next(),
                group2_name: next(),
                new_group_name: next(),
            },
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::AddGroup { .. } => OperationKind::AddGroup,
            Operation::DeleteGroup { .. } => OperationKind::DeleteGroup,
            Operation::RenameGroup { .. } => OperationKind::RenameGroup,
            Operation::AddNode { .. } => OperationKind::AddNode,
            Operation::DeleteNode { .. } => OperationKind::DeleteNode,
            Operation::RenameNode { .. } => OperationKind::RenameNode,
            Operation::AddProperty { .. } => OperationKind::AddProperty,
            Operation::DeleteProperty { .. } => OperationKind::DeleteProperty,
            Operation::RenameProperty { .. } => OperationKind::RenameProperty,
            Operation::AddDirectedEdge { .. } => OperationKind::AddDirectedEdge,
            Operation::DeleteDirectedEdge { .. } => OperationKind::DeleteDirectedEdge,
            Operation::ChangeSemanticsDirectedEdge { .. } => {
                OperationKind::ChangeSemanticsDirectedEdge
            }
            Operation::MoveNodeToOtherGroup { .. } => OperationKind::MoveNodeToOtherGroup,
            Operation::JoinGroups { .. } => OperationKind::JoinGroups,
        }
    }

    /// Parameter values in the order of [`OperationKind::parameters`]
    pub fn arguments(&self) -> Vec<&str> {
        match self {
            Operation::AddGroup { group_name } | Operation::DeleteGroup { group_name } => {
                vec![group_name.as_str()]
            }
            Operation::RenameGroup {
                old_group_name,
                new_group_name,
            } => vec![old_group_name.as_str(), new_group_name.as_str()],
            Operation::AddNode {
                node_name,
                group_name,
            }
            | Operation::DeleteNode {
                node_name,
                group_name,
            } => vec![node_name.as_str(), group_name.as_str()],
            Operation::RenameNode {
                old_node_name,
                new_node_name,
            } => vec![old_node_name.as_str(), new_node_name.as_str()],
            Operation::AddProperty {
                node_name,
                property_name,
            }
            | Operation::DeleteProperty {
                node_name,
                property_name,
            } => vec![node_name.as_str(), property_name.as_str()],
            Operation::RenameProperty {
                node_name,
                old_property_name,
                new_property_name,
            } => vec![node_name.as_str(), old_property_name.as_str(), new_property_name.as_str()],
            Operation::AddDirectedEdge {
                start,
                end,
                semantics,
            }
            | Operation::DeleteDirectedEdge {
                start,
                end,
                semantics,
            } => vec![start.as_str(), end.as_str(), semantics.as_str()],
            Operation::ChangeSemanticsDirectedEdge {
                start,
                end,
                old_semantics,
                new_semantics,
            } => vec![start.as_str(), end.as_str(), old_semantics.as_str(), new_semantics.as_str()],
            Operation::MoveNodeToOtherGroup {
                node_name,
                old_group_name,
                new_group_name,
            } => vec![node_name.as_str(), old_group_name.as_str(), new_group_name.as_str()],
            Operation::JoinGroups {
                group1_name,
                group2_name,
                new_group_name,
            } => vec![group1_name.as_str(), group2_name.as_str(), new_group_name.as_str()],
        }
    }

    /// Apply the operation to the store
    pub fn apply(&self, store: &mut GraphStore) -> GraphResult<()> {
        match self {
            Operation::AddGroup { group_name } => store.add_group(group_name),
            Operation::DeleteGroup { group_name } => store.delete_group_and_references(group_name),
            Operation::RenameGroup {
                old_group_name,
                new_group_name,
            } => store.rename_group_and_references(old_group_name, new_group_name),
            Operation::AddNode {
                node_name,
                group_name,
            } => store.add_node(node_name, group_name),
            Operation::DeleteNode {
                node_name,
                group_name,
            } => store.delete_node_and_references(group_name, node_name),
            Operation::RenameNode {
                old_node_name,
                new_node_name,
            } => store.rename_node_and_references(old_node_name, new_node_name),
            Operation::AddProperty {
                node_name,
                property_name,
            } => store.add_property(node_name, property_name),
            Operation::DeleteProperty {
                node_name,
                property_name,
            } => store.delete_property(node_name, property_name),
            Operation::RenameProperty {
                node_name,
                old_property_name,
                new_property_name,
            } => store.update_property(node_name, old_property_name, new_property_name),
            Operation::AddDirectedEdge {
                start,
                end,
                semantics,
            } => store.add_directed_edge(start, end, semantics),
            Operation::DeleteDirectedEdge {
                start,
                end,
                semantics,
            } => store.delete_directed_edge(start, end, semantics),
            Operation::ChangeSemanticsDirectedEdge {
                start,
                end,
                old_semantics,
                new_semantics,
            } => store.change_semantics_directed_edge(start, end, old_semantics, new_semantics),
            Operation::MoveNodeToOtherGroup {
                node_name,
                old_group_name,
                new_group_name,
            } => store.move_node_to_other_group(node_name, old_group_name, new_group_name),
            Operation::JoinGroups {
                group1_name,
                group2_name,
                new_group_name,
            } => store.join_groups(group1_name, group2_name, new_group_name),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        write!(f, "{}(", kind)?;
        for (i, (name, value)) in kind.parameters().iter().zip(self.arguments()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_tags_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(OperationKind::from_tag("Operation"), None);
    }

    #[test]
    fn test_from_parameters() {
        let p = params(&[
            ("group1Name", "A"),
            ("group2Name", "B"),
            ("newGroupName", "C"),
        ]);
        let op = Operation::from_parameters(OperationKind::JoinGroups, |name| p.get(name).copied())
            .unwrap();
        assert_eq!(
            op,
            Operation::JoinGroups {
                group1_name: "A".to_string(),
                group2_name: "B".to_string(),
                new_group_name: "C".to_string(),
            }
        );
        assert_eq!(op.kind(), OperationKind::JoinGroups);
    }

    #[test]
    fn test_missing_parameter() {
        let p = params(&[("nodeName", "Button")]);
        let err = Operation::from_parameters(OperationKind::DeleteNode, |name| p.get(name).copied())
            .unwrap_err();
        assert_eq!(
            err,
            MissingParameter {
                kind: OperationKind::DeleteNode,
                parameter: "groupName"
            }
        );
        assert_eq!(err.to_string(), "DeleteNode requires parameter 'groupName'");
    }

    #[test]
    fn test_every_kind_uses_its_declared_parameters() {
        for kind in OperationKind::ALL {
            let op = Operation::from_parameters(kind, Some).unwrap();
            assert_eq!(op.kind(), kind);
            assert_eq!(op.arguments(), kind.parameters().to_vec());
        }
    }

    #[test]
    fn test_display() {
        let op = Operation::AddDirectedEdge {
            start: "Button".to_string(),
            end: "Label".to_string(),
            semantics: "triggers".to_string(),
        };
        assert_eq!(
            op.to_string(),
            "AddDirectedEdge(start=Button, end=Label, semantics=triggers)"
        );
    }

    #[test]
    fn test_apply_maps_onto_store() {
        let mut store = GraphStore::new();
        let ops = [
            Operation::AddGroup {
                group_name: "UI".to_string(),
            },
            Operation::AddNode {
                node_name: "Button".to_string(),
                group_name: "UI".to_string(),
            },
            Operation::AddProperty {
                node_name: "Button".to_string(),
                property_name: "onClick".to_string(),
            },
            Operation::RenameProperty {
                node_name: "Button".to_string(),
                old_property_name: "onClick".to_string(),
                new_property_name: "onPress".to_string(),
            },
        ];
        for op in &ops {
            op.apply(&mut store).unwrap();
        }
        assert_eq!(store.node("Button").unwrap().properties, vec!["onPress"]);

        let delete = Operation::DeleteNode {
            node_name: "Ghost".to_string(),
            group_name: "UI".to_string(),
        };
        assert!(delete.apply(&mut store).is_err());
    }

    #[test]
    fn test_json_shape() {
        let op = Operation::MoveNodeToOtherGroup {
            node_name: "Button".to_string(),
            old_group_name: "UI".to_string(),
            new_group_name: "Core".to_string(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "MoveNodeToOtherGroup",
                "node_name": "Button",
                "old_group_name": "UI",
                "new_group_name": "Core"
            })
        );
        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }
}
