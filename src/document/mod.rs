//! XML documents around the graph model
//!
//! Supports:
//! - Graph documents (`Graph` / `Group` / `Node` / `Property` / `DirectedEdge`)
//! - Operations documents (`SemanticEdit` / `Operation` / one operation kind)
//! - Writing a graph into a template document
//! - Informational checks against an XSD schema
//!
//! Elements are matched by local name, so the `http://mergebench.org/ns`
//! namespace may be bound to any prefix or be the default namespace.

pub mod element;
pub mod loader;
pub mod operations;
pub mod schema;
pub mod serializer;

use crate::edit::MissingParameter;
use crate::graph::GraphError;
use thiserror::Error;

pub use element::Element;
pub use loader::load_graph;
pub use operations::{read_operations, read_sequencer};
pub use schema::{Schema, SchemaIssue, SchemaReport};
pub use serializer::write_graph;

/// Document errors
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Malformed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Document ended before <{0}> was closed")]
    Unclosed(String),

    #[error("Document has no Graph element")]
    MissingGraphElement,

    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Unexpected <{element}> inside <{parent}>")]
    UnexpectedElement { element: String, parent: String },

    /// The graph document breaks a model invariant
    #[error("Could not process <{element}> during graph construction: {source}")]
    Construction {
        element: String,
        #[source]
        source: GraphError,
    },

    #[error("Invalid index '{value}' on <{element}>")]
    InvalidIndex { element: String, value: String },

    /// An operation kind appears outside a SemanticEdit or Operation element
    #[error("<{kind}> found outside of a {missing} element")]
    OutsideContext { kind: String, missing: &'static str },

    #[error("Operation {index} of semantic edit {semantic_edit} contains no operation")]
    EmptyOperation { semantic_edit: i64, index: i64 },

    #[error("Operation {index} of semantic edit {semantic_edit} contains more than one operation")]
    AmbiguousOperation { semantic_edit: i64, index: i64 },

    #[error("Unknown operation <{0}>")]
    UnknownOperation(String),

    #[error("Invalid operation: {0}")]
    Parameter(#[from] MissingParameter),

    #[error("Invalid edit batch: {0}")]
    Sequence(#[from] crate::edit::ReplayError),

    #[error("Invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
