//! CMEO study metadata utilities.
//!
//! Helpers for turning clinical study dictionaries into CMEO RDF and
//! publishing it:
//!
//! - [`normalize`]: free-text labels to URI path segments
//! - [`uri`]: study, cohort, variable, and statistical-type URIs
//! - [`classify`]: statistical type of a variable
//! - [`age`] and [`parse`]: values pulled from free-text cells
//! - [`dictionary`]: `.csv`/`.xlsx`/`.sav` variable dictionaries, with
//!   [`sav`] decoding SPSS system files
//! - [`graph`]: in-memory study datasets and TriG files
//! - [`sparql`]: triplestore queries, inserts, deletes, and uploads
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use cmeo_metadata::classify::{classify_variable, StatisticalType};
//! use cmeo_metadata::uri::{build_entity_uri, EntityRef};
//!
//! let binary: BTreeSet<String> = ["sex".to_owned()].into();
//! let kind = classify_variable("sex", &binary, &BTreeSet::new(), None);
//! assert_eq!(kind, StatisticalType::BinaryClass);
//!
//! let uri = build_entity_uri(&EntityRef::StatisticalType { cohort: "TIME-CHF", variable: "Sex", kind })?;
//! assert_eq!(uri, "https://w3id.org/CMEO/time-chf/sex/binary_class_variable");
//! # Ok::<(), cmeo_metadata::UriError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod age;
pub mod classify;
pub mod dictionary;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod parse;
pub mod sav;
pub mod sparql;
pub mod uri;

pub use classify::{classify_variable, StatisticalType};
pub use error::{ConfigError, DictionaryError, SparqlError, UriError};
pub use normalize::normalize_text;
pub use uri::{build_entity_uri, EntityRef, UriBuilder};
