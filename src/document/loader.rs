//! Model loader
//!
//! Builds a [`GraphStore`] from a graph document. Groups, nodes, properties
//! and edges are added in document order; the enclosing group or node is
//! passed down the descent explicitly. Any element the store rejects aborts
//! the load.

use super::element::Element;
use super::{DocumentError, DocumentResult};
use crate::graph::{GraphError, GraphStore};
use tracing::{debug, info};

/// Parse a graph document into a new store
pub fn load_graph(source: &str) -> DocumentResult<GraphStore> {
    let root = Element::parse(source)?;
    load_graph_element(&root)
}

/// Build a store from an already parsed document.
///
/// The first `Graph` element found depth-first is used, so the graph may sit
/// inside wrapper elements.
pub fn load_graph_element(root: &Element) -> DocumentResult<GraphStore> {
    let graph = root.find("Graph").ok_or(DocumentError::MissingGraphElement)?;

    let mut store = GraphStore::new();
    for child in &graph.children {
        match child.name.as_str() {
            "Group" => load_group(&mut store, child)?,
            "DirectedEdge" => load_edge(&mut store, child)?,
            _ => return Err(unexpected(child, graph)),
        }
    }

    let stats = store.statistics();
    info!(
        "Loaded graph: {} groups, {} nodes, {} edges",
        stats.groups, stats.nodes, stats.edges
    );
    Ok(store)
}

fn load_group(store: &mut GraphStore, element: &Element) -> DocumentResult<()> {
    let name = element.required_attribute("name")?;
    store
        .add_group(name)
        .map_err(|source| construction(element, source))?;
    debug!("Loaded group {}", name);

    for child in &element.children {
        match child.name.as_str() {
            "Node" => load_node(store, name, child)?,
            _ => return Err(unexpected(child, element)),
        }
    }
    Ok(())
}

fn load_node(store: &mut GraphStore, group: &str, element: &Element) -> DocumentResult<()> {
    let name = element.required_attribute("name")?;
    store
        .add_node(name, group)
        .map_err(|source| construction(element, source))?;

    for child in &element.children {
        match child.name.as_str() {
            "Property" => load_property(store, name, child)?,
            _ => return Err(unexpected(child, element)),
        }
    }
    Ok(())
}

fn load_property(store: &mut GraphStore, node: &str, element: &Element) -> DocumentResult<()> {
    let name = element.required_attribute("name")?;
    store
        .add_property(node, name)
        .map_err(|source| construction(element, source))
}

fn load_edge(store: &mut GraphStore, element: &Element) -> DocumentResult<()> {
    let start = element.required_attribute("start")?;
    let end = element.required_attribute("end")?;
    let semantics = element.required_attribute("semantics")?;
    store
        .add_directed_edge(start, end, semantics)
        .map_err(|source| construction(element, source))
}

fn construction(element: &Element, source: GraphError) -> DocumentError {
    DocumentError::Construction {
        element: element.name.clone(),
        source,
    }
}

fn unexpected(element: &Element, parent: &Element) -> DocumentError {
    DocumentError::UnexpectedElement {
        element: element.name.clone(),
        parent: parent.name.clone(),
    }
}
