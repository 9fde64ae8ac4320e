//! `cmeo_documentation.json`: the machine-readable reference.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extractor::{ClassDetails, OntologyIndex, PropertyDetails};
use crate::DocsOptions;

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct JsonDocumentation<'a> {
    /// Title, description, timestamp, and counts.
    pub metadata: JsonMetadata<'a>,
    /// Class details keyed by IRI.
    pub classes: BTreeMap<&'a str, &'a ClassDetails>,
    /// Object property details keyed by IRI.
    pub object_properties: BTreeMap<&'a str, &'a PropertyDetails>,
    /// Datatype property details keyed by IRI.
    pub data_properties: BTreeMap<&'a str, &'a PropertyDetails>,
    /// Prefix to namespace IRI.
    pub namespaces: &'a BTreeMap<String, String>,
}

/// The `metadata` object.
#[derive(Debug, Serialize)]
pub struct JsonMetadata<'a> {
    /// Document title.
    pub title: &'a str,
    /// Document description.
    pub description: &'a str,
    /// ISO-8601 generation timestamp.
    pub generated_at: String,
    /// Term counts.
    pub statistics: JsonStatistics,
}

/// Term counts in `metadata.statistics`.
#[derive(Debug, Serialize)]
pub struct JsonStatistics {
    /// Number of classes.
    pub classes: usize,
    /// Number of object properties.
    pub object_properties: usize,
    /// Number of datatype properties.
    pub data_properties: usize,
    /// Number of named individuals.
    pub individuals: usize,
}

impl<'a> JsonDocumentation<'a> {
    /// Borrows everything from the index.
    #[must_use]
    pub fn new(index: &'a OntologyIndex, options: &'a DocsOptions) -> Self {
        Self {
            metadata: JsonMetadata {
                title: &options.title,
                description: &options.description,
                generated_at: options.iso_timestamp(),
                statistics: JsonStatistics {
                    classes: index.stats.classes.len(),
                    object_properties: index.stats.object_properties.len(),
                    data_properties: index.stats.data_properties.len(),
                    individuals: index.stats.individuals.len(),
                },
            },
            classes: index.classes.iter().map(|c| (c.uri.as_str(), c)).collect(),
            object_properties: by_uri(&index.object_properties),
            data_properties: by_uri(&index.data_properties),
            namespaces: &index.stats.namespaces,
        }
    }
}

fn by_uri(props: &[PropertyDetails]) -> BTreeMap<&str, &PropertyDetails> {
    props.iter().map(|p| (p.uri.as_str(), p)).collect()
}

/// Serializes the JSON documentation, pretty-printed.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json_document(index: &OntologyIndex, options: &DocsOptions) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonDocumentation::new(index, options))
}
