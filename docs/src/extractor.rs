//! Extracts statistics and per-term details from a loaded ontology.

use std::collections::BTreeMap;

use cmeo_ontology::{iris, OntologyGraph, Term};
use serde::Serialize;

use crate::linker::local_name;

/// Term inventory of an ontology: IRIs per OWL entity kind, plus prefixes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OntologyStatistics {
    /// `owl:Class` IRIs.
    pub classes: Vec<String>,
    /// `owl:ObjectProperty` IRIs.
    pub object_properties: Vec<String>,
    /// `owl:DatatypeProperty` IRIs.
    pub data_properties: Vec<String>,
    /// `owl:NamedIndividual` IRIs.
    pub individuals: Vec<String>,
    /// `owl:AnnotationProperty` IRIs.
    pub annotations: Vec<String>,
    /// Prefix to namespace IRI.
    pub namespaces: BTreeMap<String, String>,
}

impl OntologyStatistics {
    /// Collects the inventory from `graph`. Each list is sorted; blank nodes
    /// are excluded.
    #[must_use]
    pub fn from_graph(graph: &OntologyGraph) -> Self {
        Self {
            classes: graph.instances_of(iris::OWL_CLASS),
            object_properties: graph.instances_of(iris::OWL_OBJECT_PROPERTY),
            data_properties: graph.instances_of(iris::OWL_DATATYPE_PROPERTY),
            individuals: graph.instances_of(iris::OWL_NAMED_INDIVIDUAL),
            annotations: graph.instances_of(iris::OWL_ANNOTATION_PROPERTY),
            namespaces: graph.namespaces.clone(),
        }
    }
}

/// Everything the documentation shows about one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassDetails {
    /// Class IRI.
    pub uri: String,
    /// `rdfs:label`, empty if absent.
    pub label: String,
    /// `rdfs:comment`, empty if absent.
    pub comment: String,
    /// Named parents (`rdfs:subClassOf`).
    pub subclass_of: Vec<String>,
    /// Named children (classes that are `rdfs:subClassOf` this one).
    pub superclass_of: Vec<String>,
    /// `owl:equivalentClass` targets.
    pub equivalent_to: Vec<String>,
    /// `owl:disjointWith` targets.
    pub disjoint_with: Vec<String>,
    /// Anonymous `owl:Restriction` parents, rendered as text.
    pub restrictions: Vec<String>,
    /// Remaining literal-valued annotations, keyed by predicate IRI.
    pub annotations: BTreeMap<String, String>,
}

/// Everything the documentation shows about one property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetails {
    /// Property IRI.
    pub uri: String,
    /// `rdfs:label`, empty if absent.
    pub label: String,
    /// `rdfs:comment`, empty if absent.
    pub comment: String,
    /// `rdfs:domain` targets.
    pub domain: Vec<String>,
    /// `rdfs:range` targets.
    pub range: Vec<String>,
    /// `rdfs:subPropertyOf` targets.
    pub subproperty_of: Vec<String>,
    /// Properties declared `rdfs:subPropertyOf` this one.
    pub superproperty_of: Vec<String>,
    /// `owl:equivalentProperty` targets.
    pub equivalent_to: Vec<String>,
    /// `owl:inverseOf` targets.
    pub inverse_of: Vec<String>,
    /// Remaining literal-valued annotations, keyed by predicate IRI.
    pub annotations: BTreeMap<String, String>,
}

const CLASS_HANDLED: &[&str] = &[
    iris::RDF_TYPE,
    iris::RDFS_LABEL,
    iris::RDFS_COMMENT,
    iris::RDFS_SUBCLASS_OF,
    iris::OWL_EQUIVALENT_CLASS,
    iris::OWL_DISJOINT_WITH,
];

const PROPERTY_HANDLED: &[&str] = &[
    iris::RDF_TYPE,
    iris::RDFS_LABEL,
    iris::RDFS_COMMENT,
    iris::RDFS_DOMAIN,
    iris::RDFS_RANGE,
    iris::RDFS_SUBPROPERTY_OF,
    iris::OWL_EQUIVALENT_PROPERTY,
    iris::OWL_INVERSE_OF,
];

/// Collects the details of class `iri`.
#[must_use]
pub fn class_details(graph: &OntologyGraph, iri: &str) -> ClassDetails {
    let subject = Term::iri(iri);
    let restrictions = graph
        .objects(&subject, iris::RDFS_SUBCLASS_OF)
        .filter(|o| o.is_blank())
        .filter_map(|node| describe_restriction(graph, node))
        .collect();

    ClassDetails {
        uri: iri.to_owned(),
        label: preferred_literal(graph, &subject, iris::RDFS_LABEL),
        comment: preferred_literal(graph, &subject, iris::RDFS_COMMENT),
        subclass_of: iri_objects(graph, &subject, iris::RDFS_SUBCLASS_OF),
        superclass_of: iri_subjects(graph, iris::RDFS_SUBCLASS_OF, &subject),
        equivalent_to: iri_objects(graph, &subject, iris::OWL_EQUIVALENT_CLASS),
        disjoint_with: iri_objects(graph, &subject, iris::OWL_DISJOINT_WITH),
        restrictions,
        annotations: literal_annotations(graph, &subject, CLASS_HANDLED),
    }
}

/// Collects the details of property `iri`.
#[must_use]
pub fn property_details(graph: &OntologyGraph, iri: &str) -> PropertyDetails {
    let subject = Term::iri(iri);
    PropertyDetails {
        uri: iri.to_owned(),
        label: preferred_literal(graph, &subject, iris::RDFS_LABEL),
        comment: preferred_literal(graph, &subject, iris::RDFS_COMMENT),
        domain: iri_objects(graph, &subject, iris::RDFS_DOMAIN),
        range: iri_objects(graph, &subject, iris::RDFS_RANGE),
        subproperty_of: iri_objects(graph, &subject, iris::RDFS_SUBPROPERTY_OF),
        superproperty_of: iri_subjects(graph, iris::RDFS_SUBPROPERTY_OF, &subject),
        equivalent_to: iri_objects(graph, &subject, iris::OWL_EQUIVALENT_PROPERTY),
        inverse_of: iri_objects(graph, &subject, iris::OWL_INVERSE_OF),
        annotations: literal_annotations(graph, &subject, PROPERTY_HANDLED),
    }
}

/// A flattened, render-ready view of the whole ontology.
pub struct OntologyIndex {
    /// Term inventory.
    pub stats: OntologyStatistics,
    /// Details for every class, in IRI order.
    pub classes: Vec<ClassDetails>,
    /// Details for every object property, in IRI order.
    pub object_properties: Vec<PropertyDetails>,
    /// Details for every datatype property, in IRI order.
    pub data_properties: Vec<PropertyDetails>,
    /// Number of triples in the source graph.
    pub triple_count: usize,
}

impl OntologyIndex {
    /// Builds the index from a loaded graph.
    #[must_use]
    pub fn build(graph: &OntologyGraph) -> Self {
        let stats = OntologyStatistics::from_graph(graph);
        let classes = stats
            .classes
            .iter()
            .map(|iri| class_details(graph, iri))
            .collect();
        let object_properties = stats
            .object_properties
            .iter()
            .map(|iri| property_details(graph, iri))
            .collect();
        let data_properties = stats
            .data_properties
            .iter()
            .map(|iri| property_details(graph, iri))
            .collect();
        Self {
            stats,
            classes,
            object_properties,
            data_properties,
            triple_count: graph.len(),
        }
    }

    /// Finds a class by IRI.
    #[must_use]
    pub fn find_class(&self, iri: &str) -> Option<&ClassDetails> {
        self.classes.iter().find(|c| c.uri == iri)
    }

    /// Returns the namespace prefix `iri` falls under, if any.
    #[must_use]
    pub fn prefix_for(&self, iri: &str) -> Option<&str> {
        self.stats
            .namespaces
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(p, _)| p.as_str())
    }
}

/// Returns the label to display for a term: its label, or its local name.
#[must_use]
pub fn display_label<'a>(label: &'a str, iri: &'a str) -> &'a str {
    if label.is_empty() {
        local_name(iri)
    } else {
        label
    }
}

/// First untagged or English literal for `(subject, predicate)`, else any literal.
fn preferred_literal(graph: &OntologyGraph, subject: &Term, predicate: &str) -> String {
    let literals: Vec<_> = graph
        .objects(subject, predicate)
        .filter_map(Term::as_literal)
        .collect();
    literals
        .iter()
        .find(|l| matches!(l.language.as_deref(), None | Some("en")))
        .or_else(|| literals.first())
        .map(|l| l.value.clone())
        .unwrap_or_default()
}

fn iri_objects(graph: &OntologyGraph, subject: &Term, predicate: &str) -> Vec<String> {
    let mut out: Vec<String> = graph
        .objects(subject, predicate)
        .filter_map(|o| o.as_iri().map(str::to_owned))
        .collect();
    out.sort();
    out.dedup();
    out
}

fn iri_subjects(graph: &OntologyGraph, predicate: &str, object: &Term) -> Vec<String> {
    let mut out: Vec<String> = graph
        .subjects(predicate, object)
        .filter_map(|s| s.as_iri().map(str::to_owned))
        .collect();
    out.sort();
    out.dedup();
    out
}

fn literal_annotations(
    graph: &OntologyGraph,
    subject: &Term,
    handled: &[&str],
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for t in graph.about(subject) {
        if handled.contains(&t.predicate.as_str()) {
            continue;
        }
        if let Some(lit) = t.object.as_literal() {
            out.insert(t.predicate.clone(), lit.value.clone());
        }
    }
    out
}

/// Renders an `owl:Restriction` blank node as `property some|only|value filler`.
fn describe_restriction(graph: &OntologyGraph, node: &Term) -> Option<String> {
    let property = graph
        .objects(node, iris::OWL_ON_PROPERTY)
        .find_map(Term::as_iri)?;
    let (keyword, filler) = [
        ("some", iris::OWL_SOME_VALUES_FROM),
        ("only", iris::OWL_ALL_VALUES_FROM),
        ("value", iris::OWL_HAS_VALUE),
    ]
    .iter()
    .find_map(|(kw, pred)| graph.objects(node, pred).next().map(|o| (*kw, o)))?;

    let filler = match filler {
        Term::Iri(iri) => local_name(iri).to_owned(),
        Term::Literal(lit) => format!("\"{}\"", lit.value),
        Term::BlankNode(_) => "(anonymous class)".to_owned(),
    };
    Some(format!("{} {} {}", local_name(property), keyword, filler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmeo_ontology::{loader, RdfFormat};

    const TTL: &str = r#"@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/> .

ex:Animal a owl:Class ; rdfs:label "Tier"@de , "animal"@en .
ex:Dog a owl:Class ;
    rdfs:subClassOf ex:Animal ,
        [ a owl:Restriction ; owl:onProperty ex:eats ; owl:allValuesFrom ex:Food ] ;
    ex:note "good" .
ex:eats a owl:ObjectProperty ; rdfs:domain ex:Animal ; rdfs:range ex:Food .
ex:devours a owl:ObjectProperty ; rdfs:subPropertyOf ex:eats .
"#;

    fn graph() -> OntologyGraph {
        loader::parse_str(TTL, RdfFormat::Turtle).unwrap()
    }

    #[test]
    fn english_label_preferred() {
        let d = class_details(&graph(), "http://example.org/Animal");
        assert_eq!(d.label, "animal");
        assert_eq!(d.superclass_of, vec!["http://example.org/Dog"]);
    }

    #[test]
    fn restriction_and_annotation_collected() {
        let d = class_details(&graph(), "http://example.org/Dog");
        assert_eq!(d.subclass_of, vec!["http://example.org/Animal"]);
        assert_eq!(d.restrictions, vec!["eats only Food"]);
        assert_eq!(d.annotations.get("http://example.org/note").map(String::as_str), Some("good"));
    }

    #[test]
    fn property_hierarchy_both_directions() {
        let g = graph();
        let eats = property_details(&g, "http://example.org/eats");
        assert_eq!(eats.superproperty_of, vec!["http://example.org/devours"]);
        assert_eq!(eats.range, vec!["http://example.org/Food"]);
        let devours = property_details(&g, "http://example.org/devours");
        assert_eq!(devours.subproperty_of, vec!["http://example.org/eats"]);
    }

    #[test]
    fn index_counts() {
        let index = OntologyIndex::build(&graph());
        assert_eq!(index.classes.len(), 2);
        assert_eq!(index.object_properties.len(), 2);
        assert!(index.data_properties.is_empty());
        assert_eq!(index.prefix_for("http://example.org/Dog"), Some("ex"));
    }

    #[test]
    fn display_label_falls_back_to_local_name() {
        assert_eq!(display_label("", "http://example.org/Dog"), "Dog");
        assert_eq!(display_label("dog", "http://example.org/Dog"), "dog");
    }
}
