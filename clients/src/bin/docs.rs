//! `cmeo-docs`: generates documentation for an OWL ontology file.
//!
//! **Outputs** (in `--out`):
//! - `cmeo_comprehensive_documentation.html`, `index.html`
//! - `cmeo_documentation.json`, `cmeo_documentation.md`
//! - `cmeo_rdf_documentation.ttl`
//! - `cmeo_statistics.txt`, `cmeo_console_documentation.txt`, `cmeo_sparql_queries.txt`
//!
//! **Usage:**
//! ```text
//! cmeo-docs --ontology <file> [--format rdfxml|turtle|ntriples] [--out <dir>] [--title <text>] [--description <text>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cmeo_clients::{init_logging, load_rdf, parse_format};
use cmeo_docs::{generate, DocsOptions, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use cmeo_ontology::RdfFormat;

/// Generate CMEO ontology documentation.
#[derive(Parser)]
#[command(name = "cmeo-docs", about = "Generate CMEO ontology documentation")]
struct Args {
    /// Ontology file (RDF/XML, Turtle, or N-Triples).
    #[arg(long)]
    ontology: PathBuf,

    /// Input syntax; inferred from the extension when omitted.
    #[arg(long, value_parser = parse_format)]
    format: Option<RdfFormat>,

    /// Output directory for generated documentation.
    #[arg(long, env = "CMEO_DOCS_OUT", default_value = "cmeo_docs")]
    out: PathBuf,

    /// Document title.
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Document description.
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    description: String,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let graph = load_rdf(&args.ontology, args.format)?;
    let stats = cmeo_docs::extractor::OntologyStatistics::from_graph(&graph);
    println!(
        "Loaded {}: {} triples, {} classes, {} object properties, {} data properties, {} individuals, {} namespaces",
        args.ontology.display(),
        graph.len(),
        stats.classes.len(),
        stats.object_properties.len(),
        stats.data_properties.len(),
        stats.individuals.len(),
        stats.namespaces.len()
    );

    let options = DocsOptions {
        title: args.title,
        description: args.description,
        generated_at: chrono::Local::now().naive_local(),
    };
    let written = generate(&graph, &args.out, &options)?;

    println!("Documentation generated successfully.");
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}
