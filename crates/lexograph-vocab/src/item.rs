//! Compacted vocabulary records.
//!
//! One [`VocabItem`] per typed graph node. Records are produced once per
//! compaction pass and are immutable within a build; a fresh build re-parses
//! every source from scratch.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::context::TYPE_PRECEDENCE;
use crate::Iri;

/// Language tag → literal text. One value per language; an absent tag means
/// "not translated", never an error.
pub type LangMap = BTreeMap<String, String>;

/// Language tag → literal texts, for properties that SKOS allows to repeat
/// per language (`altLabel`, `hiddenLabel`, `scopeNote`).
pub type LangMultiMap = BTreeMap<String, Vec<String>>;

/// The three recognized entity kinds of the source vocabulary model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Concept,
    ConceptScheme,
    Collection,
}

impl ItemKind {
    /// Narrow a node's declared type IRIs to exactly one kind.
    ///
    /// Precedence is Concept > ConceptScheme > Collection (the order of
    /// [`TYPE_PRECEDENCE`]); `None` means the node carries no recognized
    /// type and is dropped by the compactor.
    pub fn from_declared<S: AsRef<str>>(type_iris: &[S]) -> Option<ItemKind> {
        for (iri, short) in TYPE_PRECEDENCE {
            if type_iris.iter().any(|t| t.as_ref() == *iri) {
                return ItemKind::from_short_name(short);
            }
        }
        None
    }

    pub fn from_short_name(name: &str) -> Option<ItemKind> {
        match name {
            "Concept" => Some(ItemKind::Concept),
            "ConceptScheme" => Some(ItemKind::ConceptScheme),
            "Collection" => Some(ItemKind::Collection),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            ItemKind::Concept => "Concept",
            ItemKind::ConceptScheme => "ConceptScheme",
            ItemKind::Collection => "Collection",
        }
    }
}

/// One compacted record.
///
/// Relation fields come in two flavors: *internal references* resolved to
/// other record IRIs (one-level flattening, never nested embedding) and
/// *literal matches* kept verbatim. Empty fields are omitted from the
/// serialized forms, matching the published artifact shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabItem {
    pub id: Iri,
    #[serde(rename = "type")]
    pub kind: ItemKind,

    // Language-tagged properties.
    #[serde(default, skip_serializing_if = "LangMap::is_empty")]
    pub title: LangMap,
    #[serde(default, skip_serializing_if = "LangMap::is_empty")]
    pub pref_label: LangMap,
    #[serde(default, skip_serializing_if = "LangMultiMap::is_empty")]
    pub alt_label: LangMultiMap,
    #[serde(default, skip_serializing_if = "LangMultiMap::is_empty")]
    pub hidden_label: LangMultiMap,
    #[serde(default, skip_serializing_if = "LangMap::is_empty")]
    pub definition: LangMap,
    #[serde(default, skip_serializing_if = "LangMap::is_empty")]
    pub example: LangMap,
    #[serde(default, skip_serializing_if = "LangMultiMap::is_empty")]
    pub scope_note: LangMultiMap,

    /// Language-independent codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notation: Vec<String>,

    // Derived navigation fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_scheme_all: Vec<Iri>,

    // Internal references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub narrower: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub narrower_transitive: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broader: Option<Iri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broader_transitive: Option<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_top_concept: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_concept_of: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_scheme: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member: Vec<Iri>,

    // Literal matches, untouched IRIs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exact_match: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub close_match: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub broad_match: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub narrow_match: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_match: Vec<Iri>,

    /// Discovered language set; concept schemes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<BTreeSet<String>>,
}

impl VocabItem {
    pub fn new(id: impl Into<Iri>, kind: ItemKind) -> Self {
        VocabItem {
            id: id.into(),
            kind,
            title: LangMap::new(),
            pref_label: LangMap::new(),
            alt_label: LangMultiMap::new(),
            hidden_label: LangMultiMap::new(),
            definition: LangMap::new(),
            example: LangMap::new(),
            scope_note: LangMultiMap::new(),
            notation: Vec::new(),
            parent: None,
            children: Vec::new(),
            in_scheme_all: Vec::new(),
            narrower: Vec::new(),
            narrower_transitive: Vec::new(),
            broader: None,
            broader_transitive: None,
            related: Vec::new(),
            has_top_concept: Vec::new(),
            top_concept_of: Vec::new(),
            in_scheme: Vec::new(),
            member: Vec::new(),
            exact_match: Vec::new(),
            close_match: Vec::new(),
            broad_match: Vec::new(),
            narrow_match: Vec::new(),
            related_match: Vec::new(),
            languages: None,
        }
    }

    /// Preferred label in one language, empty-value aware.
    pub fn label(&self, language: &str) -> Option<&str> {
        self.pref_label
            .get(language)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_scheme(&self) -> bool {
        self.kind == ItemKind::ConceptScheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{SKOS_COLLECTION, SKOS_CONCEPT, SKOS_CONCEPT_SCHEME};

    #[test]
    fn multi_typed_node_narrows_by_precedence() {
        let declared = vec![SKOS_COLLECTION, SKOS_CONCEPT];
        assert_eq!(ItemKind::from_declared(&declared), Some(ItemKind::Concept));

        let declared = vec![SKOS_COLLECTION, SKOS_CONCEPT_SCHEME];
        assert_eq!(
            ItemKind::from_declared(&declared),
            Some(ItemKind::ConceptScheme)
        );
    }

    #[test]
    fn unrecognized_types_yield_none() {
        let declared = vec!["http://example.org/Thing"];
        assert_eq!(ItemKind::from_declared(&declared), None);
        assert_eq!(ItemKind::from_declared::<&str>(&[]), None);
    }

    #[test]
    fn empty_fields_are_omitted_from_serialization() {
        let item = VocabItem::new("http://example.org/c1", ItemKind::Concept);
        let value = serde_json::to_value(&item).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("type").unwrap(), "Concept");
        assert!(!obj.contains_key("prefLabel"));
        assert!(!obj.contains_key("children"));
        assert!(!obj.contains_key("languages"));
    }

    #[test]
    fn label_skips_empty_translations() {
        let mut item = VocabItem::new("http://example.org/c1", ItemKind::Concept);
        item.pref_label.insert("de".into(), "Hund".into());
        item.pref_label.insert("en".into(), String::new());
        assert_eq!(item.label("de"), Some("Hund"));
        assert_eq!(item.label("en"), None);
        assert_eq!(item.label("fr"), None);
    }
}
