//! In-memory study graphs and TriG export.

use std::fs;
use std::io;
use std::path::Path;

use cmeo_ontology::namespaces::{self, iris};
use cmeo_ontology::serializer::trig;
use cmeo_ontology::{Dataset, Triple};
use tracing::{debug, info};

pub use cmeo_ontology::namespaces::study_type_iri;

/// Named graph that holds study-level metadata.
pub const STUDIES_METADATA_GRAPH: &str = "https://w3id.org/CMEO/graph/studies_metadata";

/// Prefixes bound on every study dataset, in declaration order.
const GRAPH_PREFIXES: &[&str] = &[
    "cmeo", "bfo", "obi", "stato", "obcs", "rdf", "iao", "ro", "time", "sio", "duo", "rdfs",
    "dc", "ncbi",
];

fn prefix_iri(prefix: &str) -> Option<&'static str> {
    match prefix {
        "rdf" => Some(iris::RDF),
        "rdfs" => Some(iris::RDFS),
        "dc" => Some(iris::DC),
        other => namespaces::namespace(other),
    }
}

/// Creates an empty study dataset with the CMEO prefixes bound.
///
/// `default_graph` names the dataset's primary graph; `None` selects
/// [`STUDIES_METADATA_GRAPH`].
#[must_use]
pub fn init_graph(default_graph: Option<&str>) -> Dataset {
    let mut dataset = Dataset::new();
    for prefix in GRAPH_PREFIXES {
        if let Some(iri) = prefix_iri(prefix) {
            dataset.bind(*prefix, iri);
        }
    }
    dataset.default_graph = Some(default_graph.unwrap_or(STUDIES_METADATA_GRAPH).to_owned());
    dataset
}

/// Appends `triples`, in order, to `context` (or the unnamed default graph
/// when `None`).
pub fn add_triples(dataset: &mut Dataset, triples: impl IntoIterator<Item = Triple>, context: Option<&str>) {
    for triple in triples {
        debug!(
            subject = %triple.subject,
            predicate = %triple.predicate,
            object = %triple.object,
            graph = context.unwrap_or("default"),
            "added triple"
        );
        dataset.add(triple, context);
    }
}

/// Serializes `dataset` as TriG to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the file cannot be
/// written.
pub fn save_graph_to_trig_file(dataset: &Dataset, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, trig::to_trig(dataset))?;
    info!(path = %path.display(), statements = dataset.len(), "saved TriG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmeo_ontology::{Term, CMEO};

    #[test]
    fn init_binds_all_prefixes_and_default_graph() {
        let ds = init_graph(None);
        let prefixes: Vec<&str> = ds.bindings.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(prefixes, GRAPH_PREFIXES);
        assert_eq!(ds.default_graph.as_deref(), Some(STUDIES_METADATA_GRAPH));
        assert!(ds.is_empty());

        let custom = init_graph(Some("https://w3id.org/CMEO/graph/c1"));
        assert_eq!(custom.default_graph.as_deref(), Some("https://w3id.org/CMEO/graph/c1"));
    }

    #[test]
    fn add_triples_tags_context() {
        let mut ds = init_graph(None);
        let t = Triple::new(Term::iri(format!("{CMEO}c1")), iris::RDF_TYPE, Term::iri(format!("{CMEO}cohort")));
        add_triples(&mut ds, [t.clone()], Some(STUDIES_METADATA_GRAPH));
        add_triples(&mut ds, [t], None);
        assert_eq!(ds.graph_names(), vec![Some(STUDIES_METADATA_GRAPH), None]);
    }

    #[test]
    fn trig_file_written_under_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/study.trig");
        let mut ds = init_graph(None);
        let t = Triple::new(Term::iri(format!("{CMEO}s1")), iris::DC_IDENTIFIER, Term::literal("S1"));
        add_triples(&mut ds, [t], Some(STUDIES_METADATA_GRAPH));
        save_graph_to_trig_file(&ds, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("@prefix cmeo: <https://w3id.org/CMEO/> ."));
        assert!(text.contains("cmeo:s1"));
        assert!(text.contains("dc:identifier \"S1\""));
    }

    #[test]
    fn study_types_resolve() {
        assert_eq!(
            study_type_iri("RCT").as_deref(),
            Some("https://w3id.org/CMEO/randomized_controlled_trial_design")
        );
        assert_eq!(study_type_iri("unknown"), None);
    }
}
