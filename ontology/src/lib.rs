//! CMEO ontology model, loading, and serialization.
//!
//! The `cmeo-ontology` crate reads OWL/RDF ontology files (RDF/XML, Turtle,
//! N-Triples) into owned Rust data, and serializes triples back out as
//! N-Triples, Turtle, or TriG. It also carries the fixed namespace table used
//! when building CMEO study graphs.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//!
//! let graph = cmeo_ontology::load_ontology(Path::new("cmeo.rdf"), None)?;
//! let classes = graph.instances_of(cmeo_ontology::iris::OWL_CLASS);
//! println!("{} classes", classes.len());
//! # Ok::<(), cmeo_ontology::LoadError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! use cmeo_ontology::{serializer::ntriples, Term, Triple};
//!
//! let t = Triple::new(
//!     Term::iri("https://w3id.org/CMEO/c1"),
//!     cmeo_ontology::iris::RDF_TYPE,
//!     Term::iri("https://w3id.org/CMEO/cohort"),
//! );
//! assert_eq!(ntriples::to_ntriples([&t]).lines().count(), 1);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod loader;
pub mod model;
pub mod namespaces;
pub mod serializer;

pub use loader::{load_ontology, LoadError, RdfFormat};
pub use model::{Dataset, Literal, OntologyGraph, Quad, Term, Triple};
pub use namespaces::{iris, CMEO, NAMESPACES, UNMAPPED};
