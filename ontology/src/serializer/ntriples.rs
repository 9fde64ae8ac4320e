//! N-Triples serializer.
//!
//! One triple per line, absolute IRIs only. This is the format embedded in
//! SPARQL `INSERT DATA` blocks, so each line must be a complete statement.

use crate::model::Triple;

/// Serializes `triples` to an N-Triples string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid N-Triples string.
#[must_use]
pub fn to_ntriples<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> String {
    let mut out = String::new();
    for t in triples {
        push_line(&mut out, t);
    }
    out
}

/// Serializes each triple to its own N-Triples line (without the trailing newline).
#[must_use]
pub fn to_lines<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> Vec<String> {
    triples
        .into_iter()
        .map(|t| format!("{} <{}> {} .", t.subject, t.predicate, t.object))
        .collect()
}

fn push_line(out: &mut String, t: &Triple) {
    out.push_str(&t.subject.to_string());
    out.push_str(" <");
    out.push_str(&t.predicate);
    out.push_str("> ");
    out.push_str(&t.object.to_string());
    out.push_str(" .\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;
    use crate::namespaces::iris;

    fn sample() -> Vec<Triple> {
        vec![
            Triple::new(
                Term::iri("https://w3id.org/CMEO/c1"),
                iris::RDF_TYPE,
                Term::iri("https://w3id.org/CMEO/cohort"),
            ),
            Triple::new(
                Term::iri("https://w3id.org/CMEO/c1"),
                iris::DC_IDENTIFIER,
                Term::literal("multi\nline"),
            ),
        ]
    }

    #[test]
    fn every_line_ends_with_period() {
        let nt = to_ntriples(&sample());
        assert_eq!(nt.lines().count(), 2);
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
    }

    #[test]
    fn lines_match_document() {
        let triples = sample();
        let joined: String = to_lines(&triples).iter().map(|l| format!("{l}\n")).collect();
        assert_eq!(joined, to_ntriples(&triples));
    }
}
