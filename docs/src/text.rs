//! Plain-text outputs: statistics report, console hierarchy, SPARQL cookbook.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::extractor::{display_label, OntologyIndex, PropertyDetails};
use crate::linker::local_name;
use crate::DocsOptions;

/// Renders `cmeo_statistics.txt`: totals, then term counts per namespace.
#[must_use]
pub fn statistics_report(index: &OntologyIndex, options: &DocsOptions) -> String {
    let s = &index.stats;
    let mut out = String::new();
    let _ = writeln!(out, "{} - Statistics", options.title);
    let _ = writeln!(out, "Generated: {}\n", options.display_timestamp());
    for (label, n) in [
        ("Triples", index.triple_count),
        ("Classes", s.classes.len()),
        ("Object properties", s.object_properties.len()),
        ("Data properties", s.data_properties.len()),
        ("Annotation properties", s.annotations.len()),
        ("Individuals", s.individuals.len()),
        ("Namespaces", s.namespaces.len()),
    ] {
        let _ = writeln!(out, "{label:<24}{n:>8}");
    }

    let mut per_ns: BTreeMap<&str, usize> = BTreeMap::new();
    for iri in s
        .classes
        .iter()
        .chain(&s.object_properties)
        .chain(&s.data_properties)
        .chain(&s.annotations)
        .chain(&s.individuals)
    {
        *per_ns.entry(index.prefix_for(iri).unwrap_or("(none)")).or_default() += 1;
    }
    out.push_str("\nTerms per namespace\n");
    for (prefix, n) in per_ns {
        let _ = writeln!(out, "  {prefix:<22}{n:>8}");
    }
    out
}

/// Renders `cmeo_console_documentation.txt`: the class tree followed by
/// property signatures.
///
/// Roots are classes with no named parent among the documented classes.
/// A class with several parents appears under each of them; a cycle is
/// printed once and marked. Classes reachable from no root (a subclass
/// cycle) are printed afterwards, starting from the first in IRI order.
#[must_use]
pub fn console_report(index: &OntologyIndex, options: &DocsOptions) -> String {
    let known: BTreeSet<&str> = index.classes.iter().map(|c| c.uri.as_str()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "{}\n{}\n", options.title, "=".repeat(options.title.len()));
    out.push_str("Class hierarchy\n---------------\n");

    let roots = index.classes.iter().filter(|c| {
        !c.subclass_of.iter().any(|p| known.contains(p.as_str()))
    });
    let mut path = Vec::new();
    let mut visited = BTreeSet::new();
    for root in roots {
        class_tree(&mut out, index, &root.uri, 0, &mut path, &mut visited);
    }
    for class in &index.classes {
        if !visited.contains(class.uri.as_str()) {
            class_tree(&mut out, index, &class.uri, 0, &mut path, &mut visited);
        }
    }

    out.push_str("\nObject properties\n-----------------\n");
    for prop in &index.object_properties {
        signature(&mut out, prop);
    }
    out.push_str("\nData properties\n---------------\n");
    for prop in &index.data_properties {
        signature(&mut out, prop);
    }
    out
}

fn class_tree<'a>(
    out: &mut String,
    index: &'a OntologyIndex,
    iri: &'a str,
    depth: usize,
    path: &mut Vec<&'a str>,
    visited: &mut BTreeSet<&'a str>,
) {
    let indent = "  ".repeat(depth);
    let Some(class) = index.find_class(iri) else {
        return;
    };
    if path.contains(&iri) {
        let _ = writeln!(out, "{indent}{} (cycle)", local_name(iri));
        return;
    }
    visited.insert(iri);
    let label = display_label(&class.label, iri);
    if label == local_name(iri) {
        let _ = writeln!(out, "{indent}{label}");
    } else {
        let _ = writeln!(out, "{indent}{label} [{}]", local_name(iri));
    }
    path.push(iri);
    for child in &class.superclass_of {
        class_tree(out, index, child, depth + 1, path, visited);
    }
    path.pop();
}

fn signature(out: &mut String, prop: &PropertyDetails) {
    let join = |iris: &[String]| {
        if iris.is_empty() {
            "Thing".to_owned()
        } else {
            iris.iter().map(|i| local_name(i)).collect::<Vec<_>>().join(" | ")
        }
    };
    let _ = writeln!(
        out,
        "{}: {} -> {}",
        local_name(&prop.uri),
        join(&prop.domain),
        join(&prop.range)
    );
}

/// Renders `cmeo_sparql_queries.txt`: overview queries, then one instance
/// query per class and one usage query per property.
#[must_use]
pub fn sparql_cookbook(index: &OntologyIndex) -> String {
    let mut prefixes = String::new();
    for (prefix, ns) in &index.stats.namespaces {
        let _ = writeln!(prefixes, "PREFIX {prefix}: <{ns}>");
    }

    let mut out = String::new();
    query(
        &mut out,
        "All classes with labels",
        &prefixes,
        "SELECT ?class ?label WHERE {\n  ?class a owl:Class .\n  OPTIONAL { ?class rdfs:label ?label }\n}\nORDER BY ?class",
    );
    query(
        &mut out,
        "All properties with domain and range",
        &prefixes,
        "SELECT ?property ?domain ?range WHERE {\n  { ?property a owl:ObjectProperty } UNION { ?property a owl:DatatypeProperty }\n  OPTIONAL { ?property rdfs:domain ?domain }\n  OPTIONAL { ?property rdfs:range ?range }\n}\nORDER BY ?property",
    );
    query(
        &mut out,
        "Direct subclass pairs",
        &prefixes,
        "SELECT ?child ?parent WHERE {\n  ?child rdfs:subClassOf ?parent .\n  FILTER(isIRI(?parent))\n}",
    );

    for class in &index.classes {
        query(
            &mut out,
            &format!("Instances of {}", local_name(&class.uri)),
            "",
            &format!("SELECT ?instance WHERE {{\n  ?instance a <{}> .\n}}", class.uri),
        );
    }
    for prop in index.object_properties.iter().chain(&index.data_properties) {
        query(
            &mut out,
            &format!("Usage of {}", local_name(&prop.uri)),
            "",
            &format!("SELECT ?subject ?object WHERE {{\n  ?subject <{}> ?object .\n}}", prop.uri),
        );
    }
    out
}

fn query(out: &mut String, title: &str, prefixes: &str, body: &str) {
    let _ = writeln!(out, "# {title}");
    out.push_str(prefixes);
    let _ = writeln!(out, "{body}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cmeo_ontology::{loader, RdfFormat};

    const CYCLE: &str = r#"@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/> .

ex:Animal a owl:Class .
ex:Dog a owl:Class ; rdfs:subClassOf ex:Animal .
ex:Chicken a owl:Class ; rdfs:subClassOf ex:Egg .
ex:Egg a owl:Class ; rdfs:subClassOf ex:Chicken .
"#;

    fn report(ttl: &str) -> String {
        let graph = loader::parse_str(ttl, RdfFormat::Turtle).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap();
        console_report(&OntologyIndex::build(&graph), &DocsOptions::new(at))
    }

    #[test]
    fn rootless_cycle_is_still_printed() {
        let out = report(CYCLE);
        let tree: Vec<&str> = out
            .lines()
            .skip_while(|l| !l.starts_with("---"))
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();
        assert_eq!(
            tree,
            vec!["Animal", "  Dog", "Chicken", "  Egg", "    Chicken (cycle)"]
        );
    }
}
