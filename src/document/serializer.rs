//! Model serializer
//!
//! Streams a template document through and appends the graph's groups and
//! edges, in store order, as the last children of the template's first
//! `Graph` element. The template supplies namespaces and any wrapper
//! elements. The whole output is re-indented.

use super::{DocumentError, DocumentResult};
use crate::config::ReplayConfig;
use crate::graph::{DirectedEdge, Group, GraphStore, Node};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;
use tracing::info;

/// Write the store into the template, returning the finished document
pub fn write_graph(store: &GraphStore, template: &str, config: &ReplayConfig) -> DocumentResult<String> {
    let mut reader = Reader::from_str(template);
    reader.trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), config.indent_char(), config.indent_width);

    if config.xml_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    }

    let mut depth = 0usize;
    // Depth and prefix of the open Graph element
    let mut graph: Option<(usize, Option<String>)> = None;
    let mut injected = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if !injected && graph.is_none() && is_graph(&start) {
                    graph = Some((depth, prefix_of(&start)?));
                }
                depth += 1;
                writer.write_event(Event::Start(start))?;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                let closes_graph = matches!(&graph, Some((graph_depth, _)) if *graph_depth == depth);
                if closes_graph {
                    if let Some((_, prefix)) = graph.take() {
                        write_contents(&mut writer, store, prefix.as_deref())?;
                        injected = true;
                    }
                }
                writer.write_event(Event::End(end))?;
            }
            Event::Empty(start) if !injected && graph.is_none() && is_graph(&start) => {
                let prefix = prefix_of(&start)?;
                let end = start.to_end().into_owned();
                writer.write_event(Event::Start(start))?;
                write_contents(&mut writer, store, prefix.as_deref())?;
                writer.write_event(Event::End(end))?;
                injected = true;
            }
            Event::Decl(_) => {}
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    if !injected {
        return Err(DocumentError::MissingGraphElement);
    }

    let stats = store.statistics();
    info!(
        "Serialized graph: {} groups, {} nodes, {} edges",
        stats.groups, stats.nodes, stats.edges
    );
    Ok(String::from_utf8(writer.into_inner())?)
}

fn is_graph(start: &BytesStart<'_>) -> bool {
    start.name().local_name().as_ref() == b"Graph"
}

fn prefix_of(start: &BytesStart<'_>) -> DocumentResult<Option<String>> {
    match start.name().prefix() {
        Some(prefix) => Ok(Some(String::from_utf8(prefix.as_ref().to_vec())?)),
        None => Ok(None),
    }
}

/// Element names inherit the prefix of the template's Graph element
struct Tags<'a> {
    prefix: Option<&'a str>,
}

impl Tags<'_> {
    fn start(&self, local: &str) -> BytesStart<'static> {
        match self.prefix {
            Some(prefix) => BytesStart::new(format!("{}:{}", prefix, local)),
            None => BytesStart::new(local.to_string()),
        }
    }
}

fn write_contents<W: Write>(
    writer: &mut Writer<W>,
    store: &GraphStore,
    prefix: Option<&str>,
) -> DocumentResult<()> {
    let tags = Tags { prefix };
    for group in store.groups() {
        write_group(writer, &tags, group)?;
    }
    for edge in store.edges() {
        write_edge(writer, &tags, edge)?;
    }
    Ok(())
}

fn write_group<W: Write>(writer: &mut Writer<W>, tags: &Tags<'_>, group: &Group) -> DocumentResult<()> {
    let mut start = tags.start("Group");
    start.push_attribute(("name", group.name.as_str()));
    if group.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    for node in &group.nodes {
        write_node(writer, tags, node)?;
    }
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, tags: &Tags<'_>, node: &Node) -> DocumentResult<()> {
    let mut start = tags.start("Node");
    start.push_attribute(("name", node.name.as_str()));
    if node.properties.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    for property in &node.properties {
        let mut element = tags.start("Property");
        element.push_attribute(("name", property.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_edge<W: Write>(writer: &mut Writer<W>, tags: &Tags<'_>, edge: &DirectedEdge) -> DocumentResult<()> {
    let mut element = tags.start("DirectedEdge");
    element.push_attribute(("start", edge.start.as_str()));
    element.push_attribute(("end", edge.end.as_str()));
    element.push_attribute(("semantics", edge.semantics.as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}
