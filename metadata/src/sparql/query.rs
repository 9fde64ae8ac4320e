//! SPARQL request text and result parsing.

use cmeo_ontology::model::escape_literal;
use cmeo_ontology::namespaces::{self, iris};
use cmeo_ontology::Term;
use serde::Deserialize;

use crate::error::SparqlError;

/// `ASK` whether `graph` holds any triple.
#[must_use]
pub fn ask_graph(graph: &str) -> String {
    format!("ASK WHERE {{\n    GRAPH <{graph}> {{ ?s ?p ?o }}\n}}")
}

/// `ASK` whether `graph` holds the triple `(subject, predicate, object)`.
#[must_use]
pub fn ask_triple(graph: &str, subject: &str, predicate: &str, object: &Term) -> String {
    format!("ASK WHERE {{\n    GRAPH <{graph}> {{ <{subject}> <{predicate}> {object} }}\n}}")
}

/// `DELETE WHERE` for every `subject predicate ?o` in `graph`.
///
/// `subject` and `predicate` are SPARQL patterns: a variable such as `?s`
/// or an IRI in angle brackets.
#[must_use]
pub fn delete_where(graph: &str, subject: &str, predicate: &str) -> String {
    format!(
        "PREFIX rdfs: <{}>\nDELETE WHERE {{\n    GRAPH <{graph}> {{ {subject} {predicate} ?o . }}\n}}",
        iris::RDFS
    )
}

/// `INSERT DATA` of N-Triples `lines` into `graph`.
#[must_use]
pub fn insert_data(graph: &str, lines: &[String]) -> String {
    let mut update = String::with_capacity(lines.iter().map(|l| l.len() + 5).sum::<usize>() + 64);
    update.push_str("INSERT DATA {\n  GRAPH <");
    update.push_str(graph);
    update.push_str("> {\n");
    for line in lines {
        update.push_str("    ");
        update.push_str(line);
        update.push('\n');
    }
    update.push_str("  }\n}");
    update
}

/// `ASK` whether `graph` holds a data element identified by `identifier`
/// that is part of some variable specification.
#[must_use]
pub fn ask_variable(graph: &str, identifier: &str) -> String {
    let cmeo = namespaces::namespace("cmeo").unwrap_or(cmeo_ontology::CMEO);
    let bfo = namespaces::namespace("bfo").unwrap_or_default();
    format!(
        "PREFIX cmeo: <{cmeo}>\n\
         PREFIX bfo: <{bfo}>\n\
         PREFIX rdf: <{rdf}>\n\
         PREFIX dc: <{dc}>\n\
         ASK WHERE {{\n    GRAPH <{graph}> {{\n        ?variable rdf:type cmeo:data_element ;\n            dc:identifier \"{id}\" ;\n            bfo:is_part_of ?variable_spec_uri .\n    }}\n}}",
        rdf = iris::RDF,
        dc = iris::DC,
        id = escape_literal(identifier),
    )
}

#[derive(Deserialize)]
struct AskResults {
    boolean: bool,
}

/// Reads the `boolean` field of a SPARQL JSON results document.
///
/// # Errors
///
/// Returns [`SparqlError::InvalidResults`] if the body is not an ASK result.
pub fn parse_ask(body: &str) -> Result<bool, SparqlError> {
    Ok(serde_json::from_str::<AskResults>(body)?.boolean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_triple_formats_object_terms() {
        let q = ask_triple("http://g", "http://s", "http://p", &Term::literal("a \"b\""));
        assert!(q.contains("<http://s> <http://p> \"a \\\"b\\\"\""));
        let q = ask_triple("http://g", "http://s", "http://p", &Term::iri("http://o"));
        assert!(q.contains("<http://p> <http://o> }"));
    }

    #[test]
    fn delete_uses_patterns_verbatim() {
        let q = delete_where("http://g", "?s", "<http://p>");
        assert!(q.contains("GRAPH <http://g> { ?s <http://p> ?o . }"));
    }

    #[test]
    fn insert_wraps_lines_in_graph() {
        let lines = vec!["<http://s> <http://p> \"o\" .".to_owned()];
        let u = insert_data("http://g", &lines);
        assert!(u.starts_with("INSERT DATA {\n  GRAPH <http://g> {\n"));
        assert!(u.contains("    <http://s> <http://p> \"o\" .\n"));
        assert!(u.ends_with("  }\n}"));
    }

    #[test]
    fn variable_query_uses_identifier() {
        let q = ask_variable("https://w3id.org/CMEO/graph/c1", "bmi");
        assert!(q.contains("dc:identifier \"bmi\""));
        assert!(q.contains("PREFIX bfo: <http://purl.obolibrary.org/obo/bfo.owl/>"));
    }

    #[test]
    fn ask_results_parse() {
        assert!(parse_ask(r#"{"head":{},"boolean":true}"#).unwrap());
        assert!(!parse_ask(r#"{"boolean":false}"#).unwrap());
        assert!(matches!(parse_ask("<html/>"), Err(SparqlError::InvalidResults(_))));
    }
}
