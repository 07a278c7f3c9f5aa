//! Minimal XML element tree
//!
//! Graph, operations and schema documents are small; they are read fully into
//! an [`Element`] tree and then walked by recursive descent.

use super::{DocumentError, DocumentResult};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element with its attributes and child elements.
///
/// Text content is not kept; none of the documents carry any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name (prefix stripped)
    pub name: String,

    /// Namespace prefix as written, if any
    pub prefix: Option<String>,

    /// Attributes keyed by qualified name; namespace declarations are dropped
    pub attributes: IndexMap<String, String>,

    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(source: &str) -> DocumentResult<Element> {
        let mut reader = Reader::from_str(source);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(DocumentError::EmptyDocument)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Eof => {
                    return Err(match stack.pop() {
                        Some(open) => DocumentError::Unclosed(open.name),
                        None => DocumentError::EmptyDocument,
                    })
                }
                _ => {}
            }
        }
    }

    fn from_start(start: &BytesStart<'_>) -> DocumentResult<Element> {
        let qname = start.name();
        let name = String::from_utf8(qname.local_name().as_ref().to_vec())?;
        let prefix = match qname.prefix() {
            Some(prefix) => Some(String::from_utf8(prefix.as_ref().to_vec())?),
            None => None,
        };

        let mut attributes = IndexMap::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8(attribute.key.as_ref().to_vec())?;
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attribute.unescape_value()?.into_owned();
            attributes.insert(key, value);
        }

        Ok(Element {
            name,
            prefix,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn required_attribute(&self, key: &str) -> DocumentResult<&str> {
        self.attribute(key)
            .ok_or_else(|| DocumentError::MissingAttribute {
                element: self.name.clone(),
                attribute: key.to_string(),
            })
    }

    /// First element with this local name, searching depth-first from self
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced_document() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<mb:Graph xmlns:mb="http://mergebench.org/ns">
    <mb:Group name="UI">
        <mb:Node name="Button"/>
    </mb:Group>
</mb:Graph>"#;
        let root = Element::parse(xml).unwrap();
        assert_eq!(root.name, "Graph");
        assert_eq!(root.prefix.as_deref(), Some("mb"));
        assert!(root.attributes.is_empty());

        let group = &root.children[0];
        assert_eq!(group.name, "Group");
        assert_eq!(group.attribute("name"), Some("UI"));
        assert_eq!(group.children[0].attribute("name"), Some("Button"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let root = Element::parse(r#"<Property name="a &amp; b"/>"#).unwrap();
        assert_eq!(root.attribute("name"), Some("a & b"));
    }

    #[test]
    fn test_find_and_required_attribute() {
        let root = Element::parse(r#"<Wrapper><Inner><Graph id="g"/></Inner></Wrapper>"#).unwrap();
        let graph = root.find("Graph").unwrap();
        assert_eq!(graph.required_attribute("id").unwrap(), "g");
        assert!(matches!(
            graph.required_attribute("name"),
            Err(DocumentError::MissingAttribute { .. })
        ));
        assert!(root.find("Group").is_none());
    }

    #[test]
    fn test_empty_and_truncated_documents() {
        assert!(matches!(Element::parse(""), Err(DocumentError::EmptyDocument)));
        assert!(matches!(
            Element::parse("<Graph><Group name=\"A\">"),
            Err(DocumentError::Unclosed(_))
        ));
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(
            Element::parse("<Graph><Group></Node></Graph>"),
            Err(DocumentError::Xml(_))
        ));
    }
}
