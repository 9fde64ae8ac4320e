//! Triplestore endpoint configuration.
//!
//! Loaded from a TOML file with a `[sparql]` table:
//!
//! ```toml
//! [sparql]
//! query_endpoint = "http://localhost:7878/query"
//! update_endpoint = "http://localhost:7878/update"
//! store_endpoint = "http://localhost:7878"
//! timeout_secs = 300
//! chunk_size = 500
//! ```
//!
//! `CMEO_QUERY_ENDPOINT`, `CMEO_UPDATE_ENDPOINT`, and `CMEO_STORE_ENDPOINT`
//! override the file's endpoints.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable overriding `query_endpoint`.
pub const ENV_QUERY_ENDPOINT: &str = "CMEO_QUERY_ENDPOINT";
/// Environment variable overriding `update_endpoint`.
pub const ENV_UPDATE_ENDPOINT: &str = "CMEO_UPDATE_ENDPOINT";
/// Environment variable overriding `store_endpoint`.
pub const ENV_STORE_ENDPOINT: &str = "CMEO_STORE_ENDPOINT";

/// Top-level config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Triplestore settings.
    pub sparql: SparqlConfig,
}

/// Endpoints and limits for talking to the triplestore.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SparqlConfig {
    /// SPARQL query endpoint (ASK).
    pub query_endpoint: String,
    /// SPARQL update endpoint (INSERT DATA, DELETE WHERE).
    pub update_endpoint: String,
    /// Base URL of the graph store; uploads go to `{store_endpoint}/store`.
    pub store_endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Triples per INSERT DATA request.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_chunk_size() -> usize {
    500
}

impl SparqlConfig {
    /// Creates a config with default timeout and chunk size.
    pub fn new(
        query_endpoint: impl Into<String>,
        update_endpoint: impl Into<String>,
        store_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            query_endpoint: query_endpoint.into(),
            update_endpoint: update_endpoint.into(),
            store_endpoint: store_endpoint.into(),
            timeout_secs: default_timeout_secs(),
            chunk_size: default_chunk_size(),
        }
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Replaces endpoints with values from `lookup`, keyed by the
    /// `CMEO_*_ENDPOINT` names. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (key, slot) in [
            (ENV_QUERY_ENDPOINT, &mut self.query_endpoint),
            (ENV_UPDATE_ENDPOINT, &mut self.update_endpoint),
            (ENV_STORE_ENDPOINT, &mut self.store_endpoint),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Checks that endpoints are set and limits are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("sparql.query_endpoint", &self.query_endpoint),
            ("sparql.update_endpoint", &self.update_endpoint),
            ("sparql.store_endpoint", &self.store_endpoint),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("sparql.timeout_secs must be > 0".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("sparql.chunk_size must be > 0".into()));
        }
        Ok(())
    }
}

/// Parses a config document without touching the environment.
///
/// # Errors
///
/// Returns a parse error for malformed TOML or a validation error.
pub fn parse_config(source: &str) -> Result<SparqlConfig, ConfigError> {
    let config: Config = toml::from_str(source)?;
    config.sparql.validate()?;
    Ok(config.sparql)
}

/// Loads a config file, applies environment overrides, and validates.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a value is
/// invalid after overrides.
pub fn load_config(path: &Path) -> Result<SparqlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&content)?;
    let mut sparql = config.sparql;
    sparql.apply_env_overrides();
    sparql.validate()?;
    Ok(sparql)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[sparql]
query_endpoint = "http://localhost:7878/query"
update_endpoint = "http://localhost:7878/update"
store_endpoint = "http://localhost:7878"
timeout_secs = 60
chunk_size = 100
"#;

    #[test]
    fn parses_full_config() {
        let c = parse_config(FULL).unwrap();
        assert_eq!(c.query_endpoint, "http://localhost:7878/query");
        assert_eq!(c.timeout(), Duration::from_secs(60));
        assert_eq!(c.chunk_size, 100);
    }

    #[test]
    fn limits_default() {
        let c = parse_config(
            "[sparql]\nquery_endpoint = \"q\"\nupdate_endpoint = \"u\"\nstore_endpoint = \"s\"\n",
        )
        .unwrap();
        assert_eq!(c.timeout_secs, 300);
        assert_eq!(c.chunk_size, 500);
    }

    #[test]
    fn rejects_zero_chunk_and_empty_endpoint() {
        let zero = FULL.replace("chunk_size = 100", "chunk_size = 0");
        assert!(matches!(parse_config(&zero), Err(ConfigError::Invalid(_))));
        let empty = FULL.replace("\"http://localhost:7878\"", "\"\"");
        assert!(matches!(parse_config(&empty), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse_config("[sparql]\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_endpoints() {
        let mut c = SparqlConfig::new("q", "u", "s");
        c.apply_overrides(|key| match key {
            ENV_UPDATE_ENDPOINT => Some("http://remote/update".into()),
            ENV_STORE_ENDPOINT => Some(String::new()),
            _ => None,
        });
        assert_eq!(c.query_endpoint, "q");
        assert_eq!(c.update_endpoint, "http://remote/update");
        assert_eq!(c.store_endpoint, "s");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmeo.toml");
        std::fs::write(&path, FULL).unwrap();
        assert!(load_config(&path).is_ok());
        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
