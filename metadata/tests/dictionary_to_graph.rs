use std::path::PathBuf;

use cmeo_metadata::dictionary::{categorical_sets, discover_dictionaries, load_dictionary};
use cmeo_metadata::graph::{add_triples, init_graph, save_graph_to_trig_file, STUDIES_METADATA_GRAPH};
use cmeo_metadata::{classify_variable, normalize_text, EntityRef, StatisticalType, UriBuilder};
use cmeo_ontology::{iris, Term, Triple, CMEO};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn dictionary_rows_classify_into_uris() {
    let found = discover_dictionaries(&fixtures()).unwrap();
    assert_eq!(found.len(), 1);

    let dict = load_dictionary(&found[0]).unwrap().unwrap();
    let sets = categorical_sets(&dict);
    let builder = UriBuilder::default();

    let mut classified = Vec::new();
    for row in 0..dict.len() {
        let raw = dict.get(row, "variablename").unwrap();
        let name = normalize_text(raw).unwrap();
        let kind = classify_variable(&name, &sets.binary, &sets.multi, dict.get(row, "vartype"));
        let uri = builder
            .build(&EntityRef::StatisticalType { cohort: "TIME-CHF", variable: raw, kind })
            .unwrap();
        classified.push((name, kind, uri));
    }

    let kinds: Vec<_> = classified.iter().map(|(n, k, _)| (n.as_str(), *k)).collect();
    assert_eq!(
        kinds,
        vec![
            ("sex", StatisticalType::BinaryClass),
            ("age", StatisticalType::Continuous),
            ("nyha", StatisticalType::MultiClass),
            ("bmi", StatisticalType::Continuous),
            ("visit_date", StatisticalType::Qualitative),
        ]
    );
    assert_eq!(
        classified[4].2,
        "https://w3id.org/CMEO/time-chf/visit_date/qualitative_variable"
    );
}

#[test]
fn study_graph_round_trips_to_trig() {
    let builder = UriBuilder::default();
    let cohort = builder.cohort("TIME-CHF").unwrap();
    let variable = builder.variable("TIME-CHF", "BMI").unwrap();

    let mut dataset = init_graph(None);
    add_triples(
        &mut dataset,
        [
            Triple::new(Term::iri(&cohort), iris::RDF_TYPE, Term::iri(format!("{CMEO}cohort"))),
            Triple::new(Term::iri(&variable), iris::RDF_TYPE, Term::iri(format!("{CMEO}data_element"))),
            Triple::new(Term::iri(&variable), iris::DC_IDENTIFIER, Term::literal("bmi")),
        ],
        Some(STUDIES_METADATA_GRAPH),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graphs/time_chf.trig");
    save_graph_to_trig_file(&dataset, &path).unwrap();

    let trig = std::fs::read_to_string(&path).unwrap();
    assert!(trig.contains(&format!("<{STUDIES_METADATA_GRAPH}> {{")));
    assert!(trig.contains("cmeo:time-chf\n        a cmeo:cohort ."));
    assert!(trig.contains(&format!("<{variable}>")));
}
