//! `cmeo-classify`: assigns statistical types and URIs to dictionary variables.
//!
//! Prints one tab-separated line per variable: normalized name, statistical
//! type, and statistical-type URI.
//!
//! **Usage:**
//! ```text
//! cmeo-classify --dictionary <file|dir> --cohort <name> [--namespace <iri>] [--dtype-column <name>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cmeo_clients::{classify_dictionary, init_logging};
use cmeo_metadata::dictionary::{discover_dictionaries, load_dictionary};
use cmeo_metadata::UriBuilder;
use cmeo_ontology::CMEO;
use tracing::warn;

/// Classify data-dictionary variables.
#[derive(Parser)]
#[command(name = "cmeo-classify", about = "Classify data-dictionary variables")]
struct Args {
    /// Dictionary file (.csv, .xlsx, .sav) or a directory to search.
    #[arg(long)]
    dictionary: PathBuf,

    /// Cohort the variables belong to.
    #[arg(long)]
    cohort: String,

    /// Namespace for generated URIs.
    #[arg(long, default_value = CMEO)]
    namespace: String,

    /// Column holding each variable's data type.
    #[arg(long, default_value = "vartype")]
    dtype_column: String,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let files = if args.dictionary.is_dir() {
        discover_dictionaries(&args.dictionary)?
    } else {
        vec![args.dictionary.clone()]
    };
    let builder = UriBuilder::new(args.namespace);

    let mut total = 0;
    for file in &files {
        let Some(dictionary) =
            load_dictionary(file).with_context(|| format!("Failed to load {}", file.display()))?
        else {
            warn!(path = %file.display(), "dictionary is empty");
            continue;
        };
        for row in classify_dictionary(&dictionary, &args.cohort, &builder, &args.dtype_column)? {
            println!("{}\t{}\t{}", row.name, row.kind, row.uri);
            total += 1;
        }
    }
    eprintln!("Classified {total} variables from {} dictionaries.", files.len());
    Ok(())
}
