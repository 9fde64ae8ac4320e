//! Shared plumbing for the `cmeo-*` binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::Path;

use anyhow::{Context, Result};
use cmeo_metadata::dictionary::{categorical_sets, DataDictionary, VARIABLE_COLUMN};
use cmeo_metadata::{classify_variable, normalize_text, EntityRef, StatisticalType, UriBuilder};
use cmeo_ontology::{load_ontology, OntologyGraph, RdfFormat};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn,cmeo_ontology=info,cmeo_docs=info,cmeo_metadata=info,cmeo_clients=info";

/// Installs the fmt subscriber, filtered by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `--format` values (`rdfxml`, `turtle`, `ntriples`, and aliases).
///
/// # Errors
///
/// Returns a message listing the accepted names.
pub fn parse_format(name: &str) -> std::result::Result<RdfFormat, String> {
    RdfFormat::from_name(name)
        .ok_or_else(|| format!("unknown RDF format '{name}' (expected rdfxml, turtle, or ntriples)"))
}

/// Loads an RDF file, inferring the syntax from its extension unless given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_rdf(path: &Path, format: Option<RdfFormat>) -> Result<OntologyGraph> {
    load_ontology(path, format)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// One classified dictionary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedVariable {
    /// Normalized variable name.
    pub name: String,
    /// Assigned statistical type.
    pub kind: StatisticalType,
    /// Statistical-type URI.
    pub uri: String,
}

/// Classifies every named row of `dictionary` within `cohort`.
///
/// The data type, when present, is read from `dtype_column`. Rows without a
/// usable variable name are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the cohort name is empty.
pub fn classify_dictionary(
    dictionary: &DataDictionary,
    cohort: &str,
    builder: &UriBuilder,
    dtype_column: &str,
) -> Result<Vec<ClassifiedVariable>> {
    let sets = categorical_sets(dictionary);
    let mut out = Vec::with_capacity(dictionary.len());
    for row in 0..dictionary.len() {
        let raw = dictionary.get(row, VARIABLE_COLUMN).unwrap_or_default();
        let Some(name) = normalize_text(raw) else {
            warn!(row, path = %dictionary.path.display(), "skipping row without a variable name");
            continue;
        };
        let dtype = dictionary.get(row, dtype_column).map(str::trim).filter(|d| !d.is_empty());
        let kind = classify_variable(&name, &sets.binary, &sets.multi, dtype);
        let uri = builder.build(&EntityRef::StatisticalType {
            cohort,
            variable: raw,
            kind,
        })?;
        out.push(ClassifiedVariable { name, kind, uri });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(parse_format("turtle"), Ok(RdfFormat::Turtle));
        assert_eq!(parse_format("RDFXML"), Ok(RdfFormat::RdfXml));
        assert!(parse_format("jsonld").is_err());
    }

    #[test]
    fn load_rdf_reports_path_on_failure() {
        let err = load_rdf(Path::new("/nonexistent/cmeo.rdf"), None).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cmeo.rdf"));
    }

    #[test]
    fn classifies_rows_and_skips_blank_names() {
        let dictionary = DataDictionary {
            path: "dict.csv".into(),
            headers: vec!["VariableName".into(), "Categorical".into(), "VarType".into()],
            rows: vec![
                vec!["Sex".into(), "1=m|2=f".into(), "int".into()],
                vec!["nan".into(), String::new(), String::new()],
                vec!["Comment".into(), String::new(), "str".into()],
                vec!["Weight".into(), String::new(), String::new()],
            ],
        };
        let rows = classify_dictionary(&dictionary, "c1", &UriBuilder::default(), "vartype").unwrap();
        let got: Vec<(&str, StatisticalType)> = rows.iter().map(|r| (r.name.as_str(), r.kind)).collect();
        assert_eq!(
            got,
            vec![
                ("sex", StatisticalType::BinaryClass),
                ("comment", StatisticalType::Qualitative),
                ("weight", StatisticalType::Continuous),
            ]
        );
        assert_eq!(rows[0].uri, "https://w3id.org/CMEO/c1/sex/binary_class_variable");
        assert!(classify_dictionary(&dictionary, " ", &UriBuilder::default(), "vartype").is_err());
    }
}
