//! Error types for the metadata utilities.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to derive an entity URI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// A required identifier normalized to nothing.
    #[error("{kind} identifier is empty")]
    EmptyIdentifier {
        /// Which identifier (`study`, `cohort`).
        kind: &'static str,
    },
}

/// Failure to load a data dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The extension is not `.csv`, `.xlsx` or `.sav`.
    #[error("unsupported dictionary format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Dictionary path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The SPSS system file could not be decoded.
    #[error("failed to read SPSS file {}: {source}", path.display())]
    Sav {
        /// Dictionary path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: crate::sav::SavError,
    },

    /// The CSV reader failed.
    #[error("failed to read CSV {}: {source}", path.display())]
    Csv {
        /// Dictionary path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// The workbook could not be opened or its first sheet read.
    #[error("failed to read workbook {}: {source}", path.display())]
    Xlsx {
        /// Dictionary path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: calamine::XlsxError,
    },

    /// Directory traversal failed.
    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        /// Root directory.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: walkdir::Error,
    },
}

/// Failure talking to the triplestore.
#[derive(Error, Debug)]
pub enum SparqlError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Target URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// An ASK response was not SPARQL JSON results.
    #[error("invalid SPARQL results: {0}")]
    InvalidResults(#[from] serde_json::Error),

    /// Chunked insert was asked for zero-sized chunks.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Failure to load or validate configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}
