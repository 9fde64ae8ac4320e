//! Loads ontology files into an owned [`OntologyGraph`].
//!
//! Parsing is delegated to sophia (RDF/XML via `sophia_xml`, Turtle and
//! N-Triples via `sophia_turtle`). Prefix declarations are not part of the
//! triple stream, so they are scanned from the source text separately.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use sophia_api::source::TripleSource;
use sophia_api::term::{Term as SophiaTerm, TermKind};
use sophia_api::triple::Triple as SophiaTriple;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Literal, OntologyGraph, Term, Triple};
use crate::namespaces::iris;

/// Serialization formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// RDF/XML (`.rdf`, `.owl`, `.xml`).
    RdfXml,
    /// Turtle 1.1 (`.ttl`).
    Turtle,
    /// N-Triples (`.nt`).
    NTriples,
}

impl RdfFormat {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            "ttl" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            _ => None,
        }
    }

    /// Parses a format name as given on a command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "xml" | "rdfxml" | "rdf/xml" | "owl" => Some(RdfFormat::RdfXml),
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" | "n-triples" => Some(RdfFormat::NTriples),
            _ => None,
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::Turtle => "Turtle",
            RdfFormat::NTriples => "N-Triples",
        })
    }
}

/// Errors raised while loading an ontology.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The extension does not name a known RDF format.
    #[error("Cannot infer RDF format from {}", .0.display())]
    UnknownFormat(PathBuf),
    /// The parser rejected the document.
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        /// Format that was being parsed.
        format: RdfFormat,
        /// Parser message.
        message: String,
    },
}

/// Loads an ontology file. The format is inferred from the extension unless
/// given explicitly.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, its format cannot be
/// determined, or it fails to parse.
pub fn load_ontology(path: &Path, format: Option<RdfFormat>) -> Result<OntologyGraph, LoadError> {
    let format = match format.or_else(|| RdfFormat::from_path(path)) {
        Some(f) => f,
        None => return Err(LoadError::UnknownFormat(path.to_path_buf())),
    };
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_str(&source, format)?;
    info!(
        path = %path.display(),
        %format,
        triples = graph.len(),
        prefixes = graph.namespaces.len(),
        "ontology loaded"
    );
    Ok(graph)
}

/// Parses an in-memory document.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the document is not well-formed.
pub fn parse_str(source: &str, format: RdfFormat) -> Result<OntologyGraph, LoadError> {
    let mut triples: Vec<Triple> = Vec::new();

    let outcome = match format {
        RdfFormat::RdfXml => sophia_xml::parser::parse_str(source)
            .for_each_triple(|t| collect(&mut triples, &t))
            .map_err(|e| e.to_string()),
        RdfFormat::Turtle => sophia_turtle::parser::turtle::parse_str(source)
            .for_each_triple(|t| collect(&mut triples, &t))
            .map_err(|e| e.to_string()),
        RdfFormat::NTriples => sophia_turtle::parser::nt::parse_str(source)
            .for_each_triple(|t| collect(&mut triples, &t))
            .map_err(|e| e.to_string()),
    };
    outcome.map_err(|message| LoadError::Parse { format, message })?;

    let mut graph = OntologyGraph::new();
    graph.triples = triples;
    for (prefix, iri) in scan_prefixes(source, format) {
        graph.namespaces.insert(prefix, iri);
    }
    debug!(%format, triples = graph.len(), "document parsed");
    Ok(graph)
}

fn collect<T: SophiaTriple>(out: &mut Vec<Triple>, t: &T) {
    let subject = convert_term(t.s());
    let predicate = t.p().iri().map(|iri| iri.as_str().to_owned());
    let object = convert_term(t.o());
    if let (Some(subject), Some(predicate), Some(object)) = (subject, predicate, object) {
        out.push(Triple {
            subject,
            predicate,
            object,
        });
    }
}

fn convert_term<T: SophiaTerm>(term: T) -> Option<Term> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::BlankNode(id.as_str().to_owned())),
        TermKind::Literal => {
            let value = term.lexical_form()?.to_string();
            let language = term.language_tag().map(|tag| tag.as_str().to_owned());
            // Simple literals come back typed xsd:string; keep them plain.
            let datatype = if language.is_some() {
                None
            } else {
                term.datatype()
                    .map(|dt| dt.as_str().to_owned())
                    .filter(|dt| dt != iris::XSD_STRING)
            };
            Some(Term::Literal(Literal {
                value,
                datatype,
                language,
            }))
        }
        _ => None,
    }
}

#[allow(clippy::expect_used)]
fn xmlns_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"xmlns:([A-Za-z][\w.\-]*)\s*=\s*["']([^"']*)["']"#)
            .expect("xmlns pattern is valid")
    })
}

#[allow(clippy::expect_used)]
fn turtle_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*@?prefix\s+([A-Za-z][\w.\-]*)\s*:\s*<([^>]*)>")
            .expect("prefix pattern is valid")
    })
}

/// Extracts `prefix -> namespace` declarations from the raw document.
#[must_use]
pub fn scan_prefixes(source: &str, format: RdfFormat) -> Vec<(String, String)> {
    let re = match format {
        RdfFormat::RdfXml => xmlns_regex(),
        RdfFormat::Turtle => turtle_prefix_regex(),
        RdfFormat::NTriples => return Vec::new(),
    };
    re.captures_iter(source)
        .map(|c| (c[1].to_owned(), c[2].to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: &str = r#"@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix cmeo: <https://w3id.org/CMEO/> .

cmeo:study a owl:Class ;
    rdfs:label "study"@en ;
    rdfs:comment "A study." .
"#;

    #[test]
    fn format_from_extension() {
        assert_eq!(RdfFormat::from_path(Path::new("a/b.RDF")), Some(RdfFormat::RdfXml));
        assert_eq!(RdfFormat::from_path(Path::new("x.ttl")), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_path(Path::new("x.nt")), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_path(Path::new("x.csv")), None);
    }

    #[test]
    fn xml_prefixes_must_start_with_a_letter() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns:_tmp="http://example.org/tmp#" xmlns:ex2="http://example.org/">"#;
        let prefixes = scan_prefixes(xml, RdfFormat::RdfXml);
        assert_eq!(
            prefixes,
            vec![
                ("rdf".to_owned(), "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_owned()),
                ("ex2".to_owned(), "http://example.org/".to_owned()),
            ]
        );
    }

    #[test]
    fn turtle_triples_and_prefixes() {
        let g = parse_str(TTL, RdfFormat::Turtle).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(
            g.namespaces.get("cmeo").map(String::as_str),
            Some("https://w3id.org/CMEO/")
        );
        let label = g
            .objects(&Term::iri("https://w3id.org/CMEO/study"), iris::RDFS_LABEL)
            .next()
            .and_then(Term::as_literal)
            .unwrap();
        assert_eq!(label.value, "study");
        assert_eq!(label.language.as_deref(), Some("en"));
    }

    #[test]
    fn plain_literal_has_no_datatype() {
        let g = parse_str(TTL, RdfFormat::Turtle).unwrap();
        let comment = g
            .objects(&Term::iri("https://w3id.org/CMEO/study"), iris::RDFS_COMMENT)
            .next()
            .and_then(Term::as_literal)
            .unwrap();
        assert_eq!(comment.datatype, None);
    }

    #[test]
    fn malformed_turtle_is_a_parse_error() {
        let err = parse_str("<http://a> <http://b> .", RdfFormat::Turtle).unwrap_err();
        assert!(matches!(err, LoadError::Parse { format: RdfFormat::Turtle, .. }));
    }

    #[test]
    fn xmlns_declarations_scanned() {
        let src = r#"<rdf:RDF xmlns="https://w3id.org/CMEO/"
     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:obo='http://purl.obolibrary.org/obo/'>"#;
        let prefixes = scan_prefixes(src, RdfFormat::RdfXml);
        assert_eq!(prefixes.len(), 2);
        assert_eq!(prefixes[1], ("obo".to_owned(), "http://purl.obolibrary.org/obo/".to_owned()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_ontology(Path::new("/nonexistent/cmeo.rdf"), None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = load_ontology(Path::new("cmeo.docx"), None).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat(_)));
    }
}
