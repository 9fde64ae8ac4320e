//! `cmeo_documentation.md`.

use std::fmt::Write as _;

use crate::extractor::{display_label, OntologyIndex, PropertyDetails};
use crate::linker::local_name;
use crate::DocsOptions;

/// Renders the Markdown reference.
#[must_use]
pub fn markdown_document(index: &OntologyIndex, options: &DocsOptions) -> String {
    let mut md = String::with_capacity(16 * 1024);
    let _ = write!(
        md,
        "# {}\n\n## Overview\n\n{}\n\n## Statistics\n\n\
         - **Classes**: {}\n- **Object Properties**: {}\n- **Data Properties**: {}\n- **Individuals**: {}\n\n",
        options.title,
        options.description,
        index.stats.classes.len(),
        index.stats.object_properties.len(),
        index.stats.data_properties.len(),
        index.stats.individuals.len(),
    );

    md.push_str("## Classes\n\n");
    for class in &index.classes {
        heading(&mut md, &class.label, &class.uri, &class.comment);
        iri_list(&mut md, "Subclass of", &class.subclass_of);
        iri_list(&mut md, "Equivalent to", &class.equivalent_to);
        iri_list(&mut md, "Disjoint with", &class.disjoint_with);
        if !class.restrictions.is_empty() {
            let _ = write!(md, "**Restrictions**: {}\n\n", class.restrictions.join("; "));
        }
        md.push_str("---\n\n");
    }

    md.push_str("## Object Properties\n\n");
    for prop in &index.object_properties {
        property(&mut md, prop);
    }
    md.push_str("## Data Properties\n\n");
    for prop in &index.data_properties {
        property(&mut md, prop);
    }

    md.push_str("## Namespaces\n\n");
    for (prefix, ns) in &index.stats.namespaces {
        let _ = writeln!(md, "- **{prefix}**: `{ns}`");
    }
    let _ = write!(
        md,
        "\n---\n\n*Documentation generated on {}*\n",
        options.display_timestamp()
    );
    md
}

fn heading(md: &mut String, label: &str, iri: &str, comment: &str) {
    let _ = write!(md, "### {}\n\n", display_label(label, iri));
    if !comment.is_empty() {
        let _ = write!(md, "*{comment}*\n\n");
    }
    let _ = write!(md, "**URI**: `{iri}`\n\n");
}

fn property(md: &mut String, prop: &PropertyDetails) {
    heading(md, &prop.label, &prop.uri, &prop.comment);
    iri_list(md, "Domain", &prop.domain);
    iri_list(md, "Range", &prop.range);
    iri_list(md, "Inverse of", &prop.inverse_of);
    md.push_str("---\n\n");
}

fn iri_list(md: &mut String, label: &str, iris: &[String]) {
    if iris.is_empty() {
        return;
    }
    let names: Vec<String> = iris.iter().map(|i| format!("`{}`", local_name(i))).collect();
    let _ = write!(md, "**{label}**: {}\n\n", names.join(", "));
}
