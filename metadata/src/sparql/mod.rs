//! Publishing study graphs to a SPARQL 1.1 triplestore.
//!
//! [`SparqlClient`] issues ASK queries, chunked `INSERT DATA` and
//! `DELETE WHERE` updates, and TriG uploads to the graph store. All requests
//! are blocking form POSTs sent one at a time through an [`HttpTransport`].

pub mod client;
pub mod config;
pub mod query;
pub mod transport;

pub use client::{ChunkOutcome, DeleteOutcome, InsertReport, Interruption, SparqlClient};
pub use config::{load_config, parse_config, SparqlConfig};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
