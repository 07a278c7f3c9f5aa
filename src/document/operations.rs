//! Operations document reader
//!
//! Collects every operation of an operations document together with its
//! semantic edit index and operation index. The indices of the enclosing
//! `SemanticEdit` and `Operation` elements travel down the descent as
//! arguments. Ordering is left to the [`EditSequencer`].

use super::element::Element;
use super::{DocumentError, DocumentResult};
use crate::edit::{EditSequencer, Operation, OperationDescriptor, OperationKind};
use tracing::debug;

/// Indices of the enclosing elements
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    semantic_edit: Option<i64>,
}

/// Parse an operations document into descriptors, in document order
pub fn read_operations(source: &str) -> DocumentResult<Vec<OperationDescriptor>> {
    let root = Element::parse(source)?;
    read_operations_element(&root)
}

/// Collect descriptors from an already parsed document
pub fn read_operations_element(root: &Element) -> DocumentResult<Vec<OperationDescriptor>> {
    let mut descriptors = Vec::new();
    collect(root, Context::default(), &mut descriptors)?;
    debug!("Read {} operations", descriptors.len());
    Ok(descriptors)
}

/// Parse an operations document straight into a sequencer
pub fn read_sequencer(source: &str) -> DocumentResult<EditSequencer> {
    Ok(EditSequencer::from_descriptors(read_operations(source)?)?)
}

fn collect(
    element: &Element,
    context: Context,
    out: &mut Vec<OperationDescriptor>,
) -> DocumentResult<()> {
    match element.name.as_str() {
        "SemanticEdit" => {
            let inner = Context {
                semantic_edit: Some(parse_index(element)?),
            };
            for child in &element.children {
                collect(child, inner, out)?;
            }
            Ok(())
        }
        "Operation" => {
            let semantic_edit = context
                .semantic_edit
                .ok_or_else(|| DocumentError::OutsideContext {
                    kind: element.name.clone(),
                    missing: "SemanticEdit",
                })?;
            let index = parse_index(element)?;
            out.push(OperationDescriptor::new(
                semantic_edit,
                index,
                read_operation(element, semantic_edit, index)?,
            ));
            Ok(())
        }
        name if OperationKind::from_tag(name).is_some() => Err(DocumentError::OutsideContext {
            kind: name.to_string(),
            missing: if context.semantic_edit.is_none() {
                "SemanticEdit"
            } else {
                "Operation"
            },
        }),
        _ => {
            for child in &element.children {
                collect(child, context, out)?;
            }
            Ok(())
        }
    }
}

/// The single operation-kind element inside an `Operation`
fn read_operation(element: &Element, semantic_edit: i64, index: i64) -> DocumentResult<Operation> {
    let mut found = None;
    for child in &element.children {
        let kind = OperationKind::from_tag(&child.name)
            .ok_or_else(|| DocumentError::UnknownOperation(child.name.clone()))?;
        if found.is_some() {
            return Err(DocumentError::AmbiguousOperation {
                semantic_edit,
                index,
            });
        }
        found = Some(Operation::from_parameters(kind, |parameter| {
            child.attribute(parameter)
        })?);
    }
    found.ok_or(DocumentError::EmptyOperation {
        semantic_edit,
        index,
    })
}

fn parse_index(element: &Element) -> DocumentResult<i64> {
    let value = element.required_attribute("index")?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| DocumentError::InvalidIndex {
            element: element.name.clone(),
            value: value.to_string(),
        })
}
