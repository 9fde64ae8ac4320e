//! `cmeo-publish`: moves RDF into and out of a SPARQL triplestore.
//!
//! Endpoints come from a TOML config (`[sparql]` table, path from `--config`
//! or `CMEO_CONFIG`); the `CMEO_*_ENDPOINT` environment variables override it.
//!
//! **Usage:**
//! ```text
//! cmeo-publish [--config <toml>] upload <file> [--graph <iri>]
//! cmeo-publish [--config <toml>] insert <file> --graph <iri> [--chunk-size <n>]
//! cmeo-publish [--config <toml>] exists --graph <iri> [--variable <name>]
//! cmeo-publish [--config <toml>] delete --graph <iri> [--subject <pattern>] [--predicate <pattern>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cmeo_clients::{init_logging, load_rdf, parse_format};
use cmeo_metadata::graph::{add_triples, init_graph};
use cmeo_metadata::sparql::{load_config, DeleteOutcome, SparqlClient};
use cmeo_ontology::RdfFormat;

/// Publish RDF to a SPARQL triplestore.
#[derive(Parser)]
#[command(name = "cmeo-publish", about = "Publish RDF to a SPARQL triplestore")]
struct Args {
    /// Config file with a `[sparql]` table.
    #[arg(long, env = "CMEO_CONFIG", default_value = "cmeo.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file as TriG to the graph store.
    Upload {
        /// RDF file to upload.
        file: PathBuf,
        /// Target named graph.
        #[arg(long)]
        graph: Option<String>,
        /// Input syntax; inferred from the extension when omitted.
        #[arg(long, value_parser = parse_format)]
        format: Option<RdfFormat>,
    },
    /// Append a file's triples to a named graph with chunked INSERT DATA.
    Insert {
        /// RDF file to insert.
        file: PathBuf,
        /// Target named graph.
        #[arg(long)]
        graph: String,
        /// Triples per request; defaults to the configured chunk size.
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Input syntax; inferred from the extension when omitted.
        #[arg(long, value_parser = parse_format)]
        format: Option<RdfFormat>,
    },
    /// Check whether a graph, or a variable within it, exists.
    Exists {
        /// Named graph to check.
        #[arg(long)]
        graph: String,
        /// Variable name to look for in the graph.
        #[arg(long)]
        variable: Option<String>,
    },
    /// Delete `subject predicate ?o` triples from a graph.
    Delete {
        /// Named graph to delete from.
        #[arg(long)]
        graph: String,
        /// Subject pattern.
        #[arg(long, default_value = "?s")]
        subject: String,
        /// Predicate pattern.
        #[arg(long, default_value = "?p")]
        predicate: String,
    },
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    let client = SparqlClient::new(config)?;

    match args.command {
        Command::Upload { file, graph, format } => {
            let source = load_rdf(&file, format)?;
            let mut dataset = init_graph(graph.as_deref());
            for (prefix, ns) in &source.namespaces {
                dataset.bind(prefix.as_str(), ns.as_str());
            }
            let target = dataset.default_graph.clone();
            add_triples(&mut dataset, source.triples, target.as_deref());
            if !client.publish_graph(&dataset, graph.as_deref())? {
                bail!("Upload of {} was rejected", file.display());
            }
            println!("Uploaded {} statements from {}", dataset.len(), file.display());
        }
        Command::Insert {
            file,
            graph,
            chunk_size,
            format,
        } => {
            let source = load_rdf(&file, format)?;
            let chunk_size = chunk_size.unwrap_or(client.config().chunk_size);
            let report = client.insert_triples_chunked(&graph, &source.triples, chunk_size)?;
            println!(
                "Inserted {} triples into <{graph}> in {} requests",
                report.total,
                report.chunks.len()
            );
            if let Some(stop) = &report.interrupted {
                eprintln!(
                    "  chunk {} ({} triples): no response: {}",
                    stop.index, stop.triples, stop.reason
                );
                bail!(
                    "Insert into <{graph}> interrupted; {} of {} triples applied",
                    report.applied(),
                    report.total
                );
            }
            let failed: Vec<_> = report.failed().collect();
            if !failed.is_empty() {
                for chunk in &failed {
                    eprintln!("  chunk {} ({} triples): HTTP {}", chunk.index, chunk.triples, chunk.status);
                }
                bail!("{} of {} chunks failed", failed.len(), report.chunks.len());
            }
        }
        Command::Exists { graph, variable } => {
            let exists = match &variable {
                Some(name) => client.variable_exists(&graph, name)?,
                None => client.graph_exists(&graph)?,
            };
            println!("{exists}");
        }
        Command::Delete {
            graph,
            subject,
            predicate,
        } => match client.delete_triples(&graph, &subject, &predicate)? {
            DeleteOutcome::Sent { status } if (200..300).contains(&status) => {
                println!("Deleted {subject} {predicate} ?o from <{graph}>");
            }
            DeleteOutcome::Sent { status } => bail!("Delete from <{graph}> failed: HTTP {status}"),
            DeleteOutcome::GraphMissing => println!("Graph <{graph}> does not exist"),
        },
    }
    Ok(())
}
