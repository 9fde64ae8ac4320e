//! Serializers for loaded ontologies and study datasets.
//!
//! Three serialization formats are supported:
//! - **N-Triples** ([`ntriples`]): one statement per line, used for chunked SPARQL inserts
//! - **Turtle** ([`turtle`]): prefixed, subject-grouped output for ontology documentation
//! - **TriG** ([`trig`]): Turtle with named-graph blocks, used for bulk store uploads

pub mod ntriples;
pub mod trig;
pub mod turtle;

use crate::model::{escape_literal, Term, Triple};
use crate::namespaces::iris;

/// Rewrites IRIs as `prefix:local` names where a binding allows it.
pub(crate) struct Compactor<'a> {
    prefixes: Vec<(&'a str, &'a str)>,
}

impl<'a> Compactor<'a> {
    pub(crate) fn new(prefixes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut prefixes: Vec<(&str, &str)> = prefixes
            .into_iter()
            .filter(|(_, ns)| !ns.is_empty())
            .collect();
        // Longest namespace first so nested namespaces win.
        prefixes.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));
        Self { prefixes }
    }

    pub(crate) fn iri(&self, iri: &str) -> String {
        for (prefix, ns) in &self.prefixes {
            if let Some(local) = iri.strip_prefix(ns) {
                if is_safe_local(local) {
                    return format!("{prefix}:{local}");
                }
            }
        }
        format!("<{iri}>")
    }

    pub(crate) fn predicate(&self, iri: &str) -> String {
        if iri == iris::RDF_TYPE {
            "a".to_owned()
        } else {
            self.iri(iri)
        }
    }

    pub(crate) fn term(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.iri(iri),
            Term::BlankNode(id) => format!("_:{id}"),
            Term::Literal(lit) => {
                let mut out = format!("\"{}\"", escape_literal(&lit.value));
                if let Some(lang) = &lit.language {
                    out.push('@');
                    out.push_str(lang);
                } else if let Some(dt) = &lit.datatype {
                    out.push_str("^^");
                    out.push_str(&self.iri(dt));
                }
                out
            }
        }
    }

    /// Writes `triples` grouped by subject, each statement block indented by `indent`.
    pub(crate) fn write_blocks<'t>(
        &self,
        out: &mut String,
        triples: impl IntoIterator<Item = &'t Triple>,
        indent: &str,
    ) {
        let mut subjects: Vec<&Term> = Vec::new();
        let mut grouped: Vec<Vec<&Triple>> = Vec::new();
        for t in triples {
            match subjects.iter().position(|s| *s == &t.subject) {
                Some(i) => grouped[i].push(t),
                None => {
                    subjects.push(&t.subject);
                    grouped.push(vec![t]);
                }
            }
        }

        for (subject, statements) in subjects.iter().zip(grouped) {
            out.push_str(indent);
            out.push_str(&self.term(subject));
            out.push('\n');
            let last = statements.len().saturating_sub(1);
            for (i, t) in statements.iter().enumerate() {
                out.push_str(indent);
                out.push_str("    ");
                out.push_str(&self.predicate(&t.predicate));
                out.push(' ');
                out.push_str(&self.term(&t.object));
                out.push_str(if i == last { " .\n" } else { " ;\n" });
            }
            out.push('\n');
        }
    }
}

fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compacts_only_safe_locals() {
        let c = Compactor::new([("cmeo", "https://w3id.org/CMEO/")]);
        assert_eq!(c.iri("https://w3id.org/CMEO/study_design"), "cmeo:study_design");
        assert_eq!(c.iri("https://w3id.org/CMEO/c1/age"), "<https://w3id.org/CMEO/c1/age>");
        assert_eq!(c.iri("https://w3id.org/CMEO/"), "<https://w3id.org/CMEO/>");
        assert_eq!(c.iri("http://other/x"), "<http://other/x>");
    }

    #[test]
    fn rdf_type_is_written_as_a() {
        let c = Compactor::new([("rdf", iris::RDF)]);
        assert_eq!(c.predicate(iris::RDF_TYPE), "a");
    }
}
