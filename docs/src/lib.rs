//! CMEO ontology documentation generator.
//!
//! Turns a loaded OWL ontology into a browsable set of documentation
//! artifacts: a comprehensive HTML reference, JSON and Markdown exports, a
//! Turtle re-serialization, and plain-text statistics, hierarchy, and SPARQL
//! reports, all linked from an `index.html`.
//!
//! # Entry Points
//!
//! ```no_run
//! use std::path::Path;
//!
//! let graph = cmeo_ontology::load_ontology(Path::new("cmeo.rdf"), None)?;
//! let options = cmeo_docs::DocsOptions::new(chrono::Local::now().naive_local());
//! let written = cmeo_docs::generate(&graph, Path::new("cmeo_docs"), &options)?;
//! println!("{} files", written.len());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Structure
//!
//! ```text
//! cmeo_docs/
//!   index.html                              ← Links to everything below
//!   cmeo_comprehensive_documentation.html   ← Classes, properties, namespaces
//!   cmeo_documentation.json
//!   cmeo_documentation.md
//!   cmeo_rdf_documentation.ttl
//!   cmeo_statistics.txt
//!   cmeo_console_documentation.txt
//!   cmeo_sparql_queries.txt
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod extractor;
pub mod html;
pub mod json;
pub mod linker;
pub mod markdown;
pub mod renderer;
pub mod text;
pub mod writer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use cmeo_ontology::serializer::turtle;
use cmeo_ontology::OntologyGraph;
use tracing::info;

use extractor::OntologyIndex;

/// Default document title.
pub const DEFAULT_TITLE: &str = "CMEO Ontology Documentation";

/// Default document description.
pub const DEFAULT_DESCRIPTION: &str = "Clinical Metadata Exploration Ontology";

/// Generated files, in the order they appear on the index page:
/// `(file name, kind badge, card title, card blurb)`.
pub const ARTIFACTS: &[(&str, &str, &str, &str)] = &[
    (
        "cmeo_comprehensive_documentation.html",
        "HTML",
        "Comprehensive Documentation",
        "Classes, properties, relationships, and namespaces",
    ),
    (
        "cmeo_documentation.json",
        "JSON",
        "JSON Documentation",
        "Machine-readable term details",
    ),
    (
        "cmeo_documentation.md",
        "Markdown",
        "Markdown Documentation",
        "Text reference suited to version control",
    ),
    (
        "cmeo_rdf_documentation.ttl",
        "TTL",
        "RDF Documentation",
        "The ontology re-serialized as Turtle",
    ),
    (
        "cmeo_statistics.txt",
        "TXT",
        "Statistics Report",
        "Term counts overall and per namespace",
    ),
    (
        "cmeo_console_documentation.txt",
        "TXT",
        "Console Documentation",
        "Indented class hierarchy and property signatures",
    ),
    (
        "cmeo_sparql_queries.txt",
        "TXT",
        "SPARQL Queries",
        "Ready-to-run queries for exploring the ontology",
    ),
];

/// Presentation inputs for a generation run.
#[derive(Debug, Clone)]
pub struct DocsOptions {
    /// Page and document title.
    pub title: String,
    /// Subtitle and overview text.
    pub description: String,
    /// Timestamp stamped into every artifact.
    pub generated_at: NaiveDateTime,
}

impl DocsOptions {
    /// Default title and description with the given timestamp.
    #[must_use]
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            generated_at,
        }
    }

    /// `YYYY-MM-DD HH:MM:SS`, as shown in page footers.
    #[must_use]
    pub fn display_timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// ISO-8601 timestamp for the JSON metadata.
    #[must_use]
    pub fn iso_timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Generates all documentation artifacts for `graph` into `out_dir`.
///
/// Returns the written paths, index page last.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created, JSON
/// serialization fails, or any file cannot be written.
pub fn generate(graph: &OntologyGraph, out_dir: &Path, options: &DocsOptions) -> Result<Vec<PathBuf>> {
    let index = OntologyIndex::build(graph);
    info!(
        classes = index.stats.classes.len(),
        object_properties = index.stats.object_properties.len(),
        data_properties = index.stats.data_properties.len(),
        individuals = index.stats.individuals.len(),
        namespaces = index.stats.namespaces.len(),
        "extracted ontology inventory"
    );

    writer::ensure_dir(out_dir)?;

    let json = json::json_document(&index, options).context("Failed to serialize JSON documentation")?;
    let contents = [
        html::comprehensive_page(&index, options),
        json,
        markdown::markdown_document(&index, options),
        turtle::to_turtle(graph),
        text::statistics_report(&index, options),
        text::console_report(&index, options),
        text::sparql_cookbook(&index),
    ];

    let mut written = Vec::with_capacity(ARTIFACTS.len() + 1);
    for ((name, ..), content) in ARTIFACTS.iter().zip(&contents) {
        written.push(writer::write_artifact(out_dir, name, content)?);
    }
    written.push(writer::write_artifact(
        out_dir,
        "index.html",
        &html::index_page(&index, options),
    )?);

    info!(out_dir = %out_dir.display(), files = written.len(), "documentation generated");
    Ok(written)
}
