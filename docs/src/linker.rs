//! Local names and in-page anchors for ontology IRIs.

/// Extracts the local name from an IRI: the text after the last `#` or `/`.
///
/// Returns the whole IRI when neither separator is present or the IRI ends
/// with one.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(pos) if pos + 1 < iri.len() => &iri[pos + 1..],
        _ => iri,
    }
}

/// Builds an HTML `id` for a term: `kind-localname`, with every character
/// outside `[A-Za-z0-9_-]` replaced by `_`.
#[must_use]
pub fn anchor_id(kind: &str, iri: &str) -> String {
    let local: String = local_name(iri)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{kind}-{local}")
}

/// Returns `#anchor` for a term of the given kind.
#[must_use]
pub fn anchor_href(kind: &str, iri: &str) -> String {
    format!("#{}", anchor_id(kind, iri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_after_slash_or_hash() {
        assert_eq!(local_name("https://w3id.org/CMEO/study"), "study");
        assert_eq!(local_name("http://www.w3.org/2002/07/owl#Class"), "Class");
        assert_eq!(local_name("urn:x"), "urn:x");
        assert_eq!(local_name("http://example.org/"), "http://example.org/");
    }

    #[test]
    fn anchors_are_html_safe() {
        assert_eq!(anchor_id("class", "http://e/a.b c"), "class-a_b_c");
        assert_eq!(anchor_href("prop", "http://e/has_part"), "#prop-has_part");
    }
}
