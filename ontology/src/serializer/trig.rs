//! TriG serializer for study datasets.
//!
//! Statements in the default graph are written inside a bare `{ }` block;
//! each named graph gets its own `<iri> { }` block.

use crate::model::Dataset;
use crate::serializer::Compactor;

/// Serializes a dataset to a TriG string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid TriG string.
#[must_use]
pub fn to_trig(dataset: &Dataset) -> String {
    let mut out = String::with_capacity(dataset.len() * 96);

    for (prefix, iri) in &dataset.bindings {
        out.push_str(&format!("@prefix {prefix}: <{iri}> .\n"));
    }
    out.push('\n');

    let compactor = Compactor::new(
        dataset
            .bindings
            .iter()
            .map(|(p, ns)| (p.as_str(), ns.as_str())),
    );
    for name in dataset.graph_names() {
        match name {
            Some(graph) => out.push_str(&format!("{} {{\n", compactor.iri(graph))),
            None => out.push_str("{\n"),
        }
        compactor.write_blocks(&mut out, dataset.graph_triples(name), "    ");
        out.push_str("}\n\n");
    }
    out
}
