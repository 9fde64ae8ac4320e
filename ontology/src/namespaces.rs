//! Namespace constants.
//!
//! Two separate tables: [`NAMESPACES`], the fixed prefix-to-IRI map of the
//! vocabularies used in CMEO study graphs, and [`iris`], the standard W3C
//! vocabulary IRIs. The "no mapping found" marker is the standalone
//! [`UNMAPPED`] constant and is not a namespace.

/// Base IRI of the Clinical Metadata Exploration Ontology.
pub const CMEO: &str = "https://w3id.org/CMEO/";

/// Marker value for a concept that has no mapping to any vocabulary.
pub const UNMAPPED: &str = "Unmapped";

/// Prefix name to namespace IRI for every vocabulary referenced by CMEO graphs.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("cmeo", CMEO),
    ("omop", "http://omop.org/OMOP/"),
    ("atc", "http://purl.bioontology.org/ontology/ATC/"),
    ("rxnorm", "http://purl.bioontology.org/ontology/RXNORM/"),
    ("ucum", "http://unitsofmeasure.org/"),
    ("omop_ext", "http://omop.org/omopextension/"),
    ("owl", iris::OWL),
    ("obi", "http://purl.obolibrary.org/obo/obi.owl/"),
    ("obcs", "http://purl.obolibrary.org/obo/obcs.owl/"),
    ("bfo", "http://purl.obolibrary.org/obo/bfo.owl/"),
    ("stato", "http://purl.obolibrary.org/obo/stato.owl/"),
    ("snomedct", "http://purl.bioontology.org/ontology/SNOMEDCT/"),
    ("loinc", "http://purl.bioontology.org/ontology/LNC/"),
    ("ro", "http://purl.obolibrary.org/obo/ro.owl/"),
    ("iao", "http://purl.obolibrary.org/obo/iao.owl/"),
    ("time", "http://www.w3.org/2006/time#"),
    ("sio", "http://semanticscience.org/ontology/sio.owl/"),
    ("icd10", "http://purl.bioontology.org/ontology/ICD10/"),
    ("icd9", "http://purl.bioontology.org/ontology/ICD9CM/"),
    ("duo", "http://purl.obolibrary.org/obo/duo.owl/"),
    ("ncbi", "http://purl.bioontology.org/ontology/NCBITAXON/"),
];

/// Looks up a namespace IRI by prefix name (case-insensitive).
#[must_use]
pub fn namespace(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(prefix))
        .map(|(_, iri)| *iri)
}

/// Expands `prefix:local` against [`NAMESPACES`].
#[must_use]
pub fn expand(curie: &str) -> Option<String> {
    let (prefix, local) = curie.split_once(':')?;
    namespace(prefix).map(|ns| format!("{ns}{local}"))
}

/// Study-design labels and the CMEO term each maps to.
pub const STUDY_TYPES: &[(&str, &str)] = &[
    ("observational study", "observational_study_design"),
    ("randomized controlled trial", "randomized_controlled_trial_design"),
    ("RCT", "randomized_controlled_trial_design"),
    ("federated database", "federated_database"),
    (
        "single-arm cross-over randomized intervention",
        "single_arm_cross_over_design",
    ),
];

/// Returns the CMEO IRI for a study-design label, if it is a known design.
///
/// The label is trimmed; matching is exact for `RCT` and case-insensitive
/// for the spelled-out designs.
#[must_use]
pub fn study_type_iri(label: &str) -> Option<String> {
    let label = label.trim();
    STUDY_TYPES
        .iter()
        .find(|(name, _)| *name == label || (name.len() > 3 && name.eq_ignore_ascii_case(label)))
        .map(|(_, local)| format!("{CMEO}{local}"))
}

/// Standard IRI constants.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// XML namespace.
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// Dublin Core elements namespace.
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// Dublin Core terms namespace.
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    /// SKOS namespace.
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

    /// Prefixes every loaded ontology has in scope.
    pub const STANDARD_PREFIXES: &[(&str, &str)] = &[
        ("owl", OWL),
        ("rdf", RDF),
        ("rdfs", RDFS),
        ("xml", XML),
        ("xsd", XSD),
    ];

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:subPropertyOf`.
    pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";

    /// `owl:Ontology`.
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:DatatypeProperty`.
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    /// `owl:AnnotationProperty`.
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
    /// `owl:NamedIndividual`.
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    /// `owl:Restriction`.
    pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    /// `owl:onProperty`.
    pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    /// `owl:someValuesFrom`.
    pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
    /// `owl:allValuesFrom`.
    pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
    /// `owl:hasValue`.
    pub const OWL_HAS_VALUE: &str = "http://www.w3.org/2002/07/owl#hasValue";
    /// `owl:equivalentClass`.
    pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    /// `owl:equivalentProperty`.
    pub const OWL_EQUIVALENT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#equivalentProperty";
    /// `owl:disjointWith`.
    pub const OWL_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#disjointWith";
    /// `owl:inverseOf`.
    pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
    /// `owl:versionInfo`.
    pub const OWL_VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";

    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:dateTime`.
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// `dc:identifier`.
    pub const DC_IDENTIFIER: &str = "http://purl.org/dc/elements/1.1/identifier";
}
