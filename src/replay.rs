//! File-level pipelines
//!
//! [`run`] performs a complete replay: read the graph and the operations,
//! optionally check both against their schemas, apply the operations in
//! order and write the evolved graph into the template. [`export_puml`]
//! renders a graph document as a PlantUML diagram.

use crate::config::ReplayConfig;
use crate::document::loader::load_graph_element;
use crate::document::operations::read_operations_element;
use crate::document::{write_graph, Element, Schema};
use crate::edit::{EditSequencer, ReplaySummary};
use crate::error::{EvolvError, EvolvResult};
use crate::graph::GraphStatistics;
use crate::puml::{document_statistics, render_puml};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Files taking part in a replay
#[derive(Debug, Clone)]
pub struct ReplayInputs {
    pub graph: PathBuf,
    pub graph_schema: PathBuf,
    pub operations: PathBuf,
    pub operations_schema: PathBuf,
    pub output: PathBuf,
    pub template: PathBuf,
}

/// What a successful replay did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Schema verdict for the graph document, `None` when not checked
    pub graph_valid: Option<bool>,
    pub operations_valid: Option<bool>,
    pub summary: ReplaySummary,
    /// Shape of the evolved graph
    pub statistics: GraphStatistics,
}

/// What a PlantUML export did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PumlReport {
    pub graph_valid: Option<bool>,
    pub statistics: GraphStatistics,
}

/// Replay an operations document against a graph document.
///
/// Nothing is written when any operation fails.
pub fn run(inputs: &ReplayInputs, config: &ReplayConfig) -> EvolvResult<ReplayReport> {
    let graph_document = Element::parse(&read(&inputs.graph)?)?;
    let operations_document = Element::parse(&read(&inputs.operations)?)?;

    let (graph_valid, operations_valid) = if config.validate_schemas {
        (
            Some(check_schema(&graph_document, &inputs.graph_schema, "Graph")?),
            Some(check_schema(&operations_document, &inputs.operations_schema, "Operations")?),
        )
    } else {
        (None, None)
    };

    let mut store = load_graph_element(&graph_document)?;
    let sequencer = EditSequencer::from_descriptors(read_operations_element(&operations_document)?)?;
    let summary = sequencer.replay(&mut store)?;

    let template = read(&inputs.template)?;
    let output = write_graph(&store, &template, config)?;
    write(&inputs.output, &output)?;
    info!("Wrote evolved graph to {}", inputs.output.display());

    Ok(ReplayReport {
        graph_valid,
        operations_valid,
        summary,
        statistics: store.statistics(),
    })
}

/// Render a graph document as PlantUML and write it to `output`.
///
/// The document is rendered as written, without loading it into a store.
pub fn export_puml(
    graph: &Path,
    graph_schema: &Path,
    output: &Path,
    config: &ReplayConfig,
) -> EvolvResult<PumlReport> {
    let document = Element::parse(&read(graph)?)?;
    let graph_valid = if config.validate_schemas {
        Some(check_schema(&document, graph_schema, "Graph")?)
    } else {
        None
    };

    write(output, &render_puml(&document))?;
    info!("Wrote PlantUML diagram to {}", output.display());

    Ok(PumlReport {
        graph_valid,
        statistics: document_statistics(&document),
    })
}

/// Check a document against a schema file, logging each issue
fn check_schema(document: &Element, schema: &Path, label: &str) -> EvolvResult<bool> {
    let schema = Schema::parse(&read(schema)?)?;
    let report = schema.validate(document);
    for issue in &report.issues {
        warn!("{} document: {}", label, issue);
    }
    info!("Valid {}: {}", label, report.is_valid());
    Ok(report.is_valid())
}

fn read(path: &Path) -> EvolvResult<String> {
    fs::read_to_string(path).map_err(|source| EvolvError::io(path, source))
}

fn write(path: &Path, contents: &str) -> EvolvResult<()> {
    fs::write(path, contents).map_err(|source| EvolvError::io(path, source))
}
