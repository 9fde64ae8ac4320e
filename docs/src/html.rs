//! The comprehensive HTML reference page and the output index page.

use std::fmt::Write as _;

use crate::extractor::{display_label, ClassDetails, OntologyIndex, PropertyDetails};
use crate::linker::{anchor_href, anchor_id, local_name};
use crate::renderer::{escape_html, render_comment, render_page};
use crate::DocsOptions;

/// Renders `cmeo_comprehensive_documentation.html`.
#[must_use]
pub fn comprehensive_page(index: &OntologyIndex, options: &DocsOptions) -> String {
    let mut body = String::with_capacity(64 * 1024);
    body.push_str(
        r##"<nav class="nav"><ul>
<li><a href="#overview">Overview</a></li>
<li><a href="#classes">Classes</a></li>
<li><a href="#object-properties">Object Properties</a></li>
<li><a href="#data-properties">Data Properties</a></li>
<li><a href="#namespaces">Namespaces</a></li>
</ul></nav>
<div class="content">
"##,
    );

    body.push_str("<div class=\"section\" id=\"overview\">\n<h2>Overview</h2>\n<div class=\"stats-grid\">\n");
    for (count, label) in [
        (index.stats.classes.len(), "Classes"),
        (index.stats.object_properties.len(), "Object Properties"),
        (index.stats.data_properties.len(), "Data Properties"),
        (index.stats.individuals.len(), "Individuals"),
        (index.stats.namespaces.len(), "Namespaces"),
    ] {
        stat_card(&mut body, count, label);
    }
    body.push_str("</div>\n</div>\n");

    body.push_str("<div class=\"section\" id=\"classes\">\n<h2>Classes</h2>\n");
    for class in &index.classes {
        class_item(&mut body, class, index);
    }
    body.push_str("</div>\n");

    for (id, heading, props) in [
        ("object-properties", "Object Properties", &index.object_properties),
        ("data-properties", "Data Properties", &index.data_properties),
    ] {
        let _ = writeln!(body, "<div class=\"section\" id=\"{id}\">\n<h2>{heading}</h2>");
        for prop in props {
            property_item(&mut body, prop, index);
        }
        body.push_str("</div>\n");
    }

    body.push_str("<div class=\"section\" id=\"namespaces\">\n<h2>Namespaces</h2>\n<table>\n<tr><th>Prefix</th><th>Namespace</th></tr>\n");
    for (prefix, ns) in &index.stats.namespaces {
        let _ = writeln!(
            body,
            "<tr><td><code>{}</code></td><td class=\"uri\">{}</td></tr>",
            escape_html(prefix),
            escape_html(ns)
        );
    }
    body.push_str("</table>\n</div>\n</div>\n");

    let _ = writeln!(
        body,
        "<div class=\"footer\">Documentation generated on {}</div>",
        options.display_timestamp()
    );

    render_page(&options.title, &options.description, &body)
}

/// Renders `index.html`, linking every generated artifact.
#[must_use]
pub fn index_page(index: &OntologyIndex, options: &DocsOptions) -> String {
    let mut body = String::new();
    body.push_str("<div class=\"content\">\n<div class=\"section\">\n<h2>Statistics</h2>\n<div class=\"stats-grid\">\n");
    stat_card(&mut body, index.stats.classes.len(), "Classes");
    stat_card(&mut body, index.stats.object_properties.len(), "Object Properties");
    stat_card(&mut body, index.stats.data_properties.len(), "Data Properties");
    stat_card(&mut body, index.stats.individuals.len(), "Individuals");
    body.push_str("</div>\n</div>\n");

    body.push_str("<div class=\"section\">\n<h2>Documentation Files</h2>\n<div class=\"file-grid\">\n");
    for (file, kind, title, blurb) in crate::ARTIFACTS {
        let _ = writeln!(
            body,
            "<a href=\"{file}\" class=\"file-card\">\n<div class=\"file-type\">{kind}</div>\n<h3>{title}</h3>\n<p>{blurb}</p>\n</a>"
        );
    }
    body.push_str("</div>\n</div>\n</div>\n");
    let _ = writeln!(
        body,
        "<div class=\"footer\">Documentation generated on {}</div>",
        options.display_timestamp()
    );

    render_page(&format!("{} - Index", options.title), &options.description, &body)
}

fn stat_card(out: &mut String, count: usize, label: &str) {
    let _ = writeln!(
        out,
        "<div class=\"stat-card\"><div class=\"stat-number\">{count}</div><div>{label}</div></div>"
    );
}

fn class_item(out: &mut String, class: &ClassDetails, index: &OntologyIndex) {
    let _ = writeln!(
        out,
        "<div class=\"item\" id=\"{}\">\n<h3>{}</h3>\n<p class=\"uri\">{}</p>",
        anchor_id("class", &class.uri),
        escape_html(display_label(&class.label, &class.uri)),
        escape_html(&class.uri)
    );
    if !class.comment.is_empty() {
        out.push_str(&render_comment(&class.comment));
    }
    out.push_str("<dl class=\"relations\">\n");
    relation(out, "Subclass of", &class.subclass_of, index);
    relation(out, "Superclass of", &class.superclass_of, index);
    relation(out, "Equivalent to", &class.equivalent_to, index);
    relation(out, "Disjoint with", &class.disjoint_with, index);
    if !class.restrictions.is_empty() {
        out.push_str("<dt>Restrictions</dt>\n");
        for r in &class.restrictions {
            let _ = writeln!(out, "<dd><code>{}</code></dd>", escape_html(r));
        }
    }
    annotations(out, &class.annotations);
    out.push_str("</dl>\n</div>\n");
}

fn property_item(out: &mut String, prop: &PropertyDetails, index: &OntologyIndex) {
    let _ = writeln!(
        out,
        "<div class=\"item\" id=\"{}\">\n<h3>{}</h3>\n<p class=\"uri\">{}</p>",
        anchor_id("prop", &prop.uri),
        escape_html(display_label(&prop.label, &prop.uri)),
        escape_html(&prop.uri)
    );
    if !prop.comment.is_empty() {
        out.push_str(&render_comment(&prop.comment));
    }
    out.push_str("<dl class=\"relations\">\n");
    relation(out, "Domain", &prop.domain, index);
    relation(out, "Range", &prop.range, index);
    relation(out, "Subproperty of", &prop.subproperty_of, index);
    relation(out, "Superproperty of", &prop.superproperty_of, index);
    relation(out, "Equivalent to", &prop.equivalent_to, index);
    relation(out, "Inverse of", &prop.inverse_of, index);
    annotations(out, &prop.annotations);
    out.push_str("</dl>\n</div>\n");
}

/// Writes a `<dt>`/`<dd>` group. Targets documented on this page become links.
fn relation(out: &mut String, heading: &str, targets: &[String], index: &OntologyIndex) {
    if targets.is_empty() {
        return;
    }
    let _ = writeln!(out, "<dt>{heading}</dt>");
    for iri in targets {
        let name = escape_html(local_name(iri));
        let kind = if index.find_class(iri).is_some() {
            Some("class")
        } else if index
            .object_properties
            .iter()
            .chain(&index.data_properties)
            .any(|p| &p.uri == iri)
        {
            Some("prop")
        } else {
            None
        };
        match kind {
            Some(kind) => {
                let _ = writeln!(out, "<dd><a href=\"{}\">{name}</a></dd>", anchor_href(kind, iri));
            }
            None => {
                let _ = writeln!(out, "<dd><span title=\"{}\">{name}</span></dd>", escape_html(iri));
            }
        }
    }
}

fn annotations(out: &mut String, annotations: &std::collections::BTreeMap<String, String>) {
    for (predicate, value) in annotations {
        let _ = writeln!(
            out,
            "<dt>{}</dt>\n<dd>{}</dd>",
            escape_html(local_name(predicate)),
            escape_html(value)
        );
    }
}
