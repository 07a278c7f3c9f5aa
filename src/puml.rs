//! PlantUML export
//!
//! Renders a graph document as it is written, in document order: each
//! `Group` becomes a `package`, each `Node` an `object` listing its
//! properties, and each `DirectedEdge` an arrow labelled with its semantics.
//! The document is not loaded into a store, so graphs that break model
//! invariants still render.

use crate::document::Element;
use crate::graph::GraphStatistics;
use std::fmt::Write;

/// Render a graph document as a PlantUML object diagram
pub fn render_puml(document: &Element) -> String {
    let mut out = String::new();
    render(document, &mut out);
    out
}

fn render(element: &Element, out: &mut String) {
    let name = element.attribute("name").unwrap_or_default();
    match element.name.as_str() {
        "Graph" => out.push_str("@startuml\n"),
        "Group" => {
            let _ = writeln!(out, "package {} {{", name);
        }
        "Node" => {
            let _ = writeln!(out, "object {} {{", name);
        }
        "Property" => {
            out.push_str(name);
            out.push('\n');
        }
        "DirectedEdge" => {
            let _ = writeln!(
                out,
                "{} --> {} : {}",
                element.attribute("start").unwrap_or_default(),
                element.attribute("end").unwrap_or_default(),
                element.attribute("semantics").unwrap_or_default()
            );
        }
        _ => {}
    }

    for child in &element.children {
        render(child, out);
    }

    match element.name.as_str() {
        "Graph" => out.push_str("@enduml\n"),
        "Group" | "Node" => out.push_str("}\n"),
        _ => {}
    }
}

/// Count the graph elements of a document
pub fn document_statistics(document: &Element) -> GraphStatistics {
    let mut stats = GraphStatistics::default();
    tally(document, &mut stats);
    stats
}

fn tally(element: &Element, stats: &mut GraphStatistics) {
    match element.name.as_str() {
        "Group" => stats.groups += 1,
        "Node" => stats.nodes += 1,
        "Property" => stats.properties += 1,
        "DirectedEdge" => stats.edges += 1,
        _ => {}
    }
    for child in &element.children {
        tally(child, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Element {
        Element::parse(xml).unwrap()
    }

    #[test]
    fn test_render_empty_graph() {
        assert_eq!(render_puml(&parse("<Graph/>")), "@startuml\n@enduml\n");
    }

    #[test]
    fn test_render_in_document_order() {
        let doc = parse(
            r#"<Graph xmlns="http://mergebench.org/ns">
                <Group name="UI">
                    <Node name="Button"><Property name="onClick"/></Node>
                </Group>
                <DirectedEdge start="Button" end="Core" semantics="calls"/>
                <Group name="Core"/>
            </Graph>"#,
        );

        let expected = "@startuml\n\
            package UI {\n\
            object Button {\n\
            onClick\n\
            }\n\
            }\n\
            Button --> Core : calls\n\
            package Core {\n\
            }\n\
            @enduml\n";
        assert_eq!(render_puml(&doc), expected);
    }

    #[test]
    fn test_render_ignores_model_invariants() {
        // Duplicate names and a dangling edge would be rejected by the store
        let doc = parse(
            r#"<mb:Model xmlns:mb="http://mergebench.org/ns"><mb:Graph>
                <mb:Group name="A"><mb:Node name="A"/></mb:Group>
                <mb:DirectedEdge start="A" end="Nowhere" semantics="s"/>
            </mb:Graph></mb:Model>"#,
        );
        let puml = render_puml(&doc);
        assert!(puml.starts_with("@startuml\npackage A {\nobject A {\n}\n}\n"));
        assert!(puml.contains("A --> Nowhere : s\n"));

        let stats = document_statistics(&doc);
        assert_eq!((stats.groups, stats.nodes, stats.properties, stats.edges), (1, 1, 0, 1));
    }
}
