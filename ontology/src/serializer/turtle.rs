//! Turtle 1.1 serializer for loaded ontologies.
//!
//! Emits the graph's prefix declarations, then one block per subject in
//! first-seen order, compacting IRIs against the declared prefixes.

use crate::model::OntologyGraph;
use crate::serializer::Compactor;

/// Serializes an ontology graph to a Turtle string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid Turtle string.
#[must_use]
pub fn to_turtle(graph: &OntologyGraph) -> String {
    let mut out = String::with_capacity(graph.len() * 96);

    for (prefix, iri) in &graph.namespaces {
        out.push_str(&format!("@prefix {prefix}: <{iri}> .\n"));
    }
    out.push('\n');

    let compactor = Compactor::new(
        graph
            .namespaces
            .iter()
            .map(|(p, ns)| (p.as_str(), ns.as_str())),
    );
    compactor.write_blocks(&mut out, &graph.triples, "");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{parse_str, RdfFormat};
    use crate::model::{Term, Triple};
    use crate::namespaces::iris;

    #[test]
    fn contains_prefixes_and_grouped_subject() {
        let mut g = OntologyGraph::new();
        g.namespaces
            .insert("cmeo".into(), "https://w3id.org/CMEO/".into());
        let s = Term::iri("https://w3id.org/CMEO/study");
        g.triples.push(Triple::new(s.clone(), iris::RDF_TYPE, Term::iri(iris::OWL_CLASS)));
        g.triples.push(Triple::new(s, iris::RDFS_LABEL, Term::lang_literal("study", "en")));

        let ttl = to_turtle(&g);
        assert!(ttl.contains("@prefix owl: <http://www.w3.org/2002/07/owl#> ."));
        assert!(ttl.contains("cmeo:study\n    a owl:Class ;\n    rdfs:label \"study\"@en .\n"));
    }

    #[test]
    fn output_parses_back_to_same_triple_count() {
        let src = r#"@prefix ex: <http://example.org/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
ex:a ex:p "1"^^xsd:integer , "two" ; ex:q ex:b .
ex:b ex:p [ ex:q "nested" ] .
"#;
        let g = parse_str(src, RdfFormat::Turtle).unwrap();
        let again = parse_str(&to_turtle(&g), RdfFormat::Turtle).unwrap();
        assert_eq!(g.len(), again.len());
    }
}
