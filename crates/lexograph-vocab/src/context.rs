//! Fixed property context for SKOS vocabularies.
//!
//! The compactor reduces full predicate IRIs to the short names used in the
//! record model (`prefLabel`, `inScheme`, …). The mapping is fixed: this
//! pipeline publishes SKOS and nothing else, so the context is code, not
//! configuration.

use serde_json::{json, Value};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";

pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const SKOS_CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
pub const SKOS_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";

pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const SKOS_HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
pub const SKOS_EXAMPLE: &str = "http://www.w3.org/2004/02/skos/core#example";
pub const SKOS_SCOPE_NOTE: &str = "http://www.w3.org/2004/02/skos/core#scopeNote";
pub const SKOS_NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";

pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
pub const SKOS_NARROWER_TRANSITIVE: &str =
    "http://www.w3.org/2004/02/skos/core#narrowerTransitive";
pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
pub const SKOS_BROADER_TRANSITIVE: &str =
    "http://www.w3.org/2004/02/skos/core#broaderTransitive";
pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
pub const SKOS_HAS_TOP_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#hasTopConcept";
pub const SKOS_TOP_CONCEPT_OF: &str = "http://www.w3.org/2004/02/skos/core#topConceptOf";
pub const SKOS_IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
pub const SKOS_MEMBER: &str = "http://www.w3.org/2004/02/skos/core#member";

pub const SKOS_EXACT_MATCH: &str = "http://www.w3.org/2004/02/skos/core#exactMatch";
pub const SKOS_CLOSE_MATCH: &str = "http://www.w3.org/2004/02/skos/core#closeMatch";
pub const SKOS_BROAD_MATCH: &str = "http://www.w3.org/2004/02/skos/core#broadMatch";
pub const SKOS_NARROW_MATCH: &str = "http://www.w3.org/2004/02/skos/core#narrowMatch";
pub const SKOS_RELATED_MATCH: &str = "http://www.w3.org/2004/02/skos/core#relatedMatch";

/// Recognized entity classes, in narrowing precedence order: a node that
/// declares several of these is reduced to the first one present.
pub const TYPE_PRECEDENCE: &[(&str, &str)] = &[
    (SKOS_CONCEPT, "Concept"),
    (SKOS_CONCEPT_SCHEME, "ConceptScheme"),
    (SKOS_COLLECTION, "Collection"),
];

/// Property IRI → record short name.
pub const PROPERTY_CONTEXT: &[(&str, &str)] = &[
    (DCT_TITLE, "title"),
    (SKOS_PREF_LABEL, "prefLabel"),
    (SKOS_ALT_LABEL, "altLabel"),
    (SKOS_HIDDEN_LABEL, "hiddenLabel"),
    (SKOS_DEFINITION, "definition"),
    (SKOS_EXAMPLE, "example"),
    (SKOS_SCOPE_NOTE, "scopeNote"),
    (SKOS_NOTATION, "notation"),
    (SKOS_NARROWER, "narrower"),
    (SKOS_NARROWER_TRANSITIVE, "narrowerTransitive"),
    (SKOS_BROADER, "broader"),
    (SKOS_BROADER_TRANSITIVE, "broaderTransitive"),
    (SKOS_RELATED, "related"),
    (SKOS_HAS_TOP_CONCEPT, "hasTopConcept"),
    (SKOS_TOP_CONCEPT_OF, "topConceptOf"),
    (SKOS_IN_SCHEME, "inScheme"),
    (SKOS_MEMBER, "member"),
    (SKOS_EXACT_MATCH, "exactMatch"),
    (SKOS_CLOSE_MATCH, "closeMatch"),
    (SKOS_BROAD_MATCH, "broadMatch"),
    (SKOS_NARROW_MATCH, "narrowMatch"),
    (SKOS_RELATED_MATCH, "relatedMatch"),
];

/// Short record name for a property IRI, if the context knows it.
pub fn property_name(iri: &str) -> Option<&'static str> {
    PROPERTY_CONTEXT
        .iter()
        .find(|(full, _)| *full == iri)
        .map(|(_, short)| *short)
}

/// Short class name for a type IRI, if it is one of the recognized kinds.
pub fn type_name(iri: &str) -> Option<&'static str> {
    TYPE_PRECEDENCE
        .iter()
        .find(|(full, _)| *full == iri)
        .map(|(_, short)| *short)
}

/// The `@context` object prepended to linked-data record serializations.
///
/// `id`/`type` are aliased to `@id`/`@type` so the plain and linked-data
/// forms carry identical property values and differ only in framing.
pub fn json_ld_context() -> Value {
    json!({
        "@version": 1.1,
        "@vocab": SKOS_NS,
        "id": "@id",
        "type": "@type",
        "title": { "@id": DCT_TITLE, "@container": "@language" },
        "prefLabel": { "@container": "@language" },
        "altLabel": { "@container": "@language" },
        "hiddenLabel": { "@container": "@language" },
        "definition": { "@container": "@language" },
        "example": { "@container": "@language" },
        "scopeNote": { "@container": "@language" },
        "narrower": { "@type": "@id" },
        "narrowerTransitive": { "@type": "@id" },
        "broader": { "@type": "@id" },
        "broaderTransitive": { "@type": "@id" },
        "related": { "@type": "@id" },
        "hasTopConcept": { "@type": "@id" },
        "topConceptOf": { "@type": "@id" },
        "inScheme": { "@type": "@id" },
        "inSchemeAll": { "@type": "@id" },
        "member": { "@type": "@id" },
        "exactMatch": { "@type": "@id" },
        "closeMatch": { "@type": "@id" },
        "broadMatch": { "@type": "@id" },
        "narrowMatch": { "@type": "@id" },
        "relatedMatch": { "@type": "@id" },
        "parent": { "@type": "@id" },
        "children": { "@type": "@id" },
    })
}
