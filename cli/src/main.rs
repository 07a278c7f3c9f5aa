//! Evolv CLI: replay semantic edits onto graph models
//!
//! `evolv replay` takes the same six files as the model tooling pipeline:
//! graph, graph schema, operations, operations schema, output and template.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use evolv::{load_graph, read_sequencer, ReplayConfig, ReplayInputs};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "evolv", version, about = "Replay semantic edits onto graph models")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "EVOLV_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log every applied operation
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an operations document to a graph and write the result
    Replay {
        graph: PathBuf,
        graph_schema: PathBuf,
        operations: PathBuf,
        operations_schema: PathBuf,
        output: PathBuf,
        template: PathBuf,

        /// Skip the schema checks
        #[arg(long)]
        no_validate: bool,
    },
    /// Render a graph document as a PlantUML diagram
    Puml {
        graph: PathBuf,
        graph_schema: PathBuf,
        output: PathBuf,

        /// Skip the schema check
        #[arg(long)]
        no_validate: bool,
    },
    /// List the groups, nodes and edges of a graph document
    Inspect { graph: PathBuf },
    /// Show the order in which an operations document would be applied
    Plan { operations: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Replay {
                graph,
                graph_schema,
                operations,
                operations_schema,
                output,
                template,
                no_validate,
            } => {
                let inputs = ReplayInputs {
                    graph,
                    graph_schema,
                    operations,
                    operations_schema,
                    output,
                    template,
                };
                run_replay(&inputs, without_validation(config, no_validate), &cli.format)
            }
            Commands::Puml {
                graph,
                graph_schema,
                output,
                no_validate,
            } => run_puml(
                &graph,
                &graph_schema,
                &output,
                without_validation(config, no_validate),
                &cli.format,
            ),
            Commands::Inspect { graph } => run_inspect(&graph, &cli.format),
            Commands::Plan { operations } => run_plan(&operations, &cli.format),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ReplayConfig, evolv::ConfigError> {
    match path {
        Some(path) => ReplayConfig::from_yaml_file(path),
        None => Ok(ReplayConfig::default()),
    }
}

fn without_validation(mut config: ReplayConfig, no_validate: bool) -> ReplayConfig {
    if no_validate {
        config.validate_schemas = false;
    }
    config
}

fn read_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e).into())
}

fn verdict(valid: Option<bool>) -> String {
    match valid {
        Some(true) => "valid".to_string(),
        Some(false) => "invalid".to_string(),
        None => "not checked".to_string(),
    }
}

fn run_replay(
    inputs: &ReplayInputs,
    config: ReplayConfig,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = evolv::run(inputs, &config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Graph schema:      {}", verdict(report.graph_valid));
            println!("Operations schema: {}", verdict(report.operations_valid));
            println!("Semantic edits:    {}", report.summary.semantic_edits);
            println!("Operations:        {}", report.summary.operations);
            println!(
                "Result:            {} groups, {} nodes, {} edges",
                report.statistics.groups, report.statistics.nodes, report.statistics.edges
            );
            println!("Written to {}", inputs.output.display());
        }
    }

    Ok(())
}

fn run_puml(
    graph: &Path,
    graph_schema: &Path,
    output: &Path,
    config: ReplayConfig,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = evolv::export_puml(graph, graph_schema, output, &config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Graph schema: {}", verdict(report.graph_valid));
            println!("Written to {}", output.display());
        }
    }

    Ok(())
}

fn run_inspect(graph: &Path, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_graph(&read_file(graph)?)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&store)?);
        }
        OutputFormat::Csv => {
            println!("group,node,properties");
            for group in store.groups() {
                for node in &group.nodes {
                    println!(
                        "{},{},{}",
                        format_csv_value(&group.name),
                        format_csv_value(&node.name),
                        format_csv_value(&node.properties.join(";"))
                    );
                }
            }
        }
        OutputFormat::Table => {
            let mut nodes = Table::new();
            nodes.set_content_arrangement(ContentArrangement::Dynamic);
            nodes.set_header(vec!["Group", "Node", "Properties"]);
            for group in store.groups() {
                if group.is_empty() {
                    nodes.add_row(vec![group.name.as_str(), "", ""]);
                }
                for node in &group.nodes {
                    nodes.add_row(vec![
                        group.name.clone(),
                        node.name.clone(),
                        node.properties.join(", "),
                    ]);
                }
            }
            println!("{}", nodes);

            if store.edge_count() > 0 {
                let mut edges = Table::new();
                edges.set_content_arrangement(ContentArrangement::Dynamic);
                edges.set_header(vec!["Start", "End", "Semantics"]);
                for edge in store.edges() {
                    edges.add_row(vec![
                        edge.start.as_str(),
                        edge.end.as_str(),
                        edge.semantics.as_str(),
                    ]);
                }
                println!("{}", edges);
            }

            let stats = store.statistics();
            println!(
                "{} group(s), {} node(s), {} property(ies), {} edge(s)",
                stats.groups, stats.nodes, stats.properties, stats.edges
            );
        }
    }

    Ok(())
}

fn run_plan(operations: &Path, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let sequencer = read_sequencer(&read_file(operations)?)?;

    match format {
        OutputFormat::Json => {
            let plan: Vec<_> = sequencer.plan().collect();
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Csv => {
            println!("step,semantic_edit,index,operation");
            for step in sequencer.plan() {
                println!(
                    "{},{},{},{}",
                    step.step,
                    step.semantic_edit,
                    step.index,
                    format_csv_value(&step.operation.to_string())
                );
            }
        }
        OutputFormat::Table => {
            if sequencer.is_empty() {
                println!("(no operations)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Step", "Semantic edit", "Index", "Operation"]);
            for step in sequencer.plan() {
                table.add_row(vec![
                    step.step.to_string(),
                    step.semantic_edit.to_string(),
                    step.index.to_string(),
                    step.operation.to_string(),
                ]);
            }
            println!("{}", table);
            println!(
                "{} operation(s) in {} semantic edit(s)",
                sequencer.len(),
                sequencer.semantic_edit_count()
            );
        }
    }

    Ok(())
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
