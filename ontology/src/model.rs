//! Core RDF model types.
//!
//! Terms and triples are owned values so a loaded ontology or an in-memory
//! study dataset can outlive the parser that produced it. The top-level
//! containers are [`OntologyGraph`] (a parsed ontology file) and [`Dataset`]
//! (triples tagged with named graphs, ready for TriG export).

use std::collections::BTreeMap;
use std::fmt;

use crate::namespaces::iris;

/// An RDF term in subject or object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its local label.
    BlankNode(String),
    /// A literal with an optional datatype IRI or language tag.
    Literal(Literal),
}

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    /// Lexical form.
    pub value: String,
    /// Datatype IRI; `None` for plain and language-tagged literals.
    pub datatype: Option<String>,
    /// Language tag (e.g. `en`).
    pub language: Option<String>,
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a plain literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    /// Creates a literal with an explicit datatype IRI.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        })
    }

    /// Creates a language-tagged literal.
    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        })
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for blank nodes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }
}

/// Writes the term in N-Triples syntax.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", escape_literal(&lit.value))?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Escapes a literal's lexical form for N-Triples, Turtle, and SPARQL.
#[must_use]
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// A single RDF statement. The predicate is always an IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject (IRI or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Term,
}

impl Triple {
    /// Creates a triple.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// A triple tagged with the named graph it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// The statement.
    pub triple: Triple,
    /// Named graph IRI; `None` for the default graph.
    pub graph: Option<String>,
}

/// A parsed ontology: its triples and the prefix bindings in scope.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    /// All triples, in parse order.
    pub triples: Vec<Triple>,
    /// Prefix name to namespace IRI.
    pub namespaces: BTreeMap<String, String>,
}

impl OntologyGraph {
    /// Creates an empty graph with the standard RDF/OWL prefixes bound.
    #[must_use]
    pub fn new() -> Self {
        let mut namespaces = BTreeMap::new();
        for (prefix, iri) in iris::STANDARD_PREFIXES {
            namespaces.insert((*prefix).to_owned(), (*iri).to_owned());
        }
        Self {
            triples: Vec::new(),
            namespaces,
        }
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All objects of `(subject, predicate, ?)`. The yielded terms borrow
    /// the graph only, so they outlive the lookup key.
    pub fn objects<'a: 'q, 'q>(
        &'a self,
        subject: &'q Term,
        predicate: &'q str,
    ) -> impl Iterator<Item = &'a Term> + 'q {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// All subjects of `(?, predicate, object)`.
    pub fn subjects<'a: 'q, 'q>(
        &'a self,
        predicate: &'q str,
        object: &'q Term,
    ) -> impl Iterator<Item = &'a Term> + 'q {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && &t.object == object)
            .map(|t| &t.subject)
    }

    /// All triples whose subject is `subject`.
    pub fn about<'a: 'q, 'q>(&'a self, subject: &'q Term) -> impl Iterator<Item = &'a Triple> + 'q {
        self.triples.iter().filter(move |t| &t.subject == subject)
    }

    /// IRIs declared `rdf:type <class_iri>`, sorted and deduplicated.
    /// Blank-node instances are skipped.
    #[must_use]
    pub fn instances_of(&self, class_iri: &str) -> Vec<String> {
        let class = Term::iri(class_iri);
        let mut out: Vec<String> = self
            .subjects(iris::RDF_TYPE, &class)
            .filter_map(|s| s.as_iri().map(str::to_owned))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Finds the prefix whose namespace is the longest match for `iri`.
    #[must_use]
    pub fn prefix_for(&self, iri: &str) -> Option<(&str, &str)> {
        self.namespaces
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(p, ns)| (p.as_str(), ns.as_str()))
    }
}

/// An RDF dataset under construction: prefix bindings plus quads.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Prefix bindings in declaration order.
    pub bindings: Vec<(String, String)>,
    /// The named graph created alongside the dataset, if any.
    pub default_graph: Option<String>,
    /// All statements in insertion order.
    pub quads: Vec<Quad>,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `namespace`, replacing any earlier binding of `prefix`.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        if let Some(slot) = self.bindings.iter_mut().find(|(p, _)| *p == prefix) {
            slot.1 = namespace;
        } else {
            self.bindings.push((prefix, namespace));
        }
    }

    /// Adds a statement to `graph` (or the default graph when `None`).
    pub fn add(&mut self, triple: Triple, graph: Option<&str>) {
        self.quads.push(Quad {
            triple,
            graph: graph.map(str::to_owned),
        });
    }

    /// Number of statements across all graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Returns true if no statements were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// The triples of one graph, in insertion order.
    pub fn graph_triples<'a>(
        &'a self,
        graph: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.quads
            .iter()
            .filter(move |q| q.graph.as_deref() == graph)
            .map(|q| &q.triple)
    }

    /// Distinct graph names in first-use order (`None` is the default graph).
    #[must_use]
    pub fn graph_names(&self) -> Vec<Option<&str>> {
        let mut names: Vec<Option<&str>> = Vec::new();
        for quad in &self.quads {
            let name = quad.graph.as_deref();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
