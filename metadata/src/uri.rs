//! Deterministic entity URIs under a fixed namespace.

use cmeo_ontology::CMEO;
use tracing::warn;

use crate::classify::StatisticalType;
use crate::error::UriError;
use crate::normalize::normalize_text;

/// An entity whose URI can be derived from raw identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef<'a> {
    /// A study: `{ns}{study}`.
    Study(&'a str),
    /// A cohort: `{ns}{cohort}`.
    Cohort(&'a str),
    /// A cohort-scoped variable: `{ns}{cohort}/{variable}`.
    Variable {
        /// Owning cohort.
        cohort: &'a str,
        /// Variable name.
        variable: &'a str,
    },
    /// A variable's statistical type: `{ns}{cohort}/{variable}/{kind}`.
    StatisticalType {
        /// Owning cohort.
        cohort: &'a str,
        /// Variable name.
        variable: &'a str,
        /// Assigned type.
        kind: StatisticalType,
    },
}

/// Builds entity URIs under one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriBuilder {
    namespace: String,
}

impl Default for UriBuilder {
    fn default() -> Self {
        Self::new(CMEO)
    }
}

impl UriBuilder {
    /// Creates a builder for `namespace`, used verbatim as the URI prefix.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The namespace prefix.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Derives the URI of `entity`. Identifiers are normalized first.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::EmptyIdentifier`] when the study or cohort
    /// identifier normalizes to nothing. An empty variable name is logged
    /// and yields an empty final segment.
    pub fn build(&self, entity: &EntityRef<'_>) -> Result<String, UriError> {
        match *entity {
            EntityRef::Study(id) => Ok(format!("{}{}", self.namespace, required("study", id)?)),
            EntityRef::Cohort(id) => Ok(format!("{}{}", self.namespace, required("cohort", id)?)),
            EntityRef::Variable { cohort, variable } => self.variable_uri(cohort, variable),
            EntityRef::StatisticalType {
                cohort,
                variable,
                kind,
            } => Ok(format!("{}/{}", self.variable_uri(cohort, variable)?, kind)),
        }
    }

    /// Shorthand for [`EntityRef::Study`].
    ///
    /// # Errors
    ///
    /// See [`UriBuilder::build`].
    pub fn study(&self, id: &str) -> Result<String, UriError> {
        self.build(&EntityRef::Study(id))
    }

    /// Shorthand for [`EntityRef::Cohort`].
    ///
    /// # Errors
    ///
    /// See [`UriBuilder::build`].
    pub fn cohort(&self, id: &str) -> Result<String, UriError> {
        self.build(&EntityRef::Cohort(id))
    }

    /// Shorthand for [`EntityRef::Variable`].
    ///
    /// # Errors
    ///
    /// See [`UriBuilder::build`].
    pub fn variable(&self, cohort: &str, variable: &str) -> Result<String, UriError> {
        self.build(&EntityRef::Variable { cohort, variable })
    }

    fn variable_uri(&self, cohort: &str, variable: &str) -> Result<String, UriError> {
        let cohort = required("cohort", cohort)?;
        let variable = normalize_text(variable).unwrap_or_else(|| {
            warn!(cohort = %cohort, "variable identifier is empty");
            String::new()
        });
        Ok(format!("{}{}/{}", self.namespace, cohort, variable))
    }
}

/// Derives a URI under the CMEO namespace.
///
/// # Errors
///
/// See [`UriBuilder::build`].
pub fn build_entity_uri(entity: &EntityRef<'_>) -> Result<String, UriError> {
    UriBuilder::default().build(entity)
}

fn required(kind: &'static str, raw: &str) -> Result<String, UriError> {
    normalize_text(raw).ok_or(UriError::EmptyIdentifier { kind })
}
