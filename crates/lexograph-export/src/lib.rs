//! Artifact export for Lexograph.
//!
//! Every emitted record exists in two forms over identical property values:
//!
//! - plain form (`{path}.json`), and
//! - linked-data form (`{path}.jsonld`): the same object with the fixed
//!   `@context` prepended; the context aliases `id`/`type` to `@id`/`@type`,
//!   so only the framing differs.
//!
//! This crate also decides the **hash-URI embedding plan**: a concept whose
//! mapped output path equals its owning scheme's mapped path has no
//! addressable location of its own (it is a fragment inside the scheme's
//! document), so it is inlined into the scheme's `embeddedConcepts` instead
//! of being emitted standalone. When two schemes' path spaces collide over
//! one concept, the first scheme processed in file-discovery order wins the
//! embedding.
//!
//! [`writer::ArtifactWriter`] is the only component in the pipeline with
//! I/O side effects.

pub mod writer;

pub use writer::{ArtifactWriter, WriteError};

use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use lexograph_vocab::{context, paths, Iri, VocabItem};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize record {id}: {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Plain-form record value. Empty fields are omitted.
pub fn record_json(item: &VocabItem) -> Result<Value, ExportError> {
    serde_json::to_value(item).map_err(|source| ExportError::Serialize {
        id: item.id.clone(),
        source,
    })
}

/// Linked-data form: identical property values plus `@context` framing.
pub fn record_json_ld(item: &VocabItem) -> Result<Value, ExportError> {
    let mut value = record_json(item)?;
    if let Value::Object(object) = &mut value {
        object.insert("@context".to_string(), context::json_ld_context());
    }
    Ok(value)
}

/// Both serialized forms of a hash-URI concept, inlined into its scheme.
#[derive(Debug, Clone)]
pub struct EmbeddedConcept {
    pub id: Iri,
    pub json: Value,
    pub json_ld: Value,
}

/// Artifact plan for one concept scheme.
#[derive(Debug, Clone)]
pub struct SchemePlan {
    pub scheme_id: Iri,
    /// Member concepts that get their own `{path}.json`/`{path}.jsonld`.
    pub standalone: Vec<Iri>,
    /// Hash-URI members, in traversal order.
    pub embedded: Vec<EmbeddedConcept>,
}

/// Partition a scheme's member concepts into standalone and embedded.
///
/// `claimed` carries embedding decisions across schemes: a concept already
/// embedded by an earlier scheme is not emitted again.
pub fn plan_scheme(
    scheme: &VocabItem,
    members: &[&VocabItem],
    claimed: &mut HashSet<Iri>,
) -> Result<SchemePlan, ExportError> {
    let scheme_path = paths::to_file_path(&scheme.id, None);
    let mut plan = SchemePlan {
        scheme_id: scheme.id.clone(),
        standalone: Vec::new(),
        embedded: Vec::new(),
    };

    for concept in members {
        if paths::to_file_path(&concept.id, None) == scheme_path {
            if claimed.insert(concept.id.clone()) {
                plan.embedded.push(EmbeddedConcept {
                    id: concept.id.clone(),
                    json: record_json(concept)?,
                    json_ld: record_json_ld(concept)?,
                });
            }
        } else {
            plan.standalone.push(concept.id.clone());
        }
    }
    Ok(plan)
}

/// Serialized scheme record with its embedded concepts appended.
pub fn scheme_record(
    scheme: &VocabItem,
    embedded: &[EmbeddedConcept],
    linked_data: bool,
) -> Result<Value, ExportError> {
    let mut value = if linked_data {
        record_json_ld(scheme)?
    } else {
        record_json(scheme)?
    };
    if !embedded.is_empty() {
        if let Value::Object(object) = &mut value {
            let inlined: Vec<Value> = embedded
                .iter()
                .map(|e| {
                    if linked_data {
                        e.json_ld.clone()
                    } else {
                        e.json.clone()
                    }
                })
                .collect();
            object.insert("embeddedConcepts".to_string(), Value::Array(inlined));
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexograph_vocab::ItemKind;

    fn scheme_with_hash_members() -> (VocabItem, VocabItem, VocabItem) {
        let scheme = VocabItem::new("http://example.org/hashVocab#", ItemKind::ConceptScheme);
        let mut inline = VocabItem::new("http://example.org/hashVocab#concept1", ItemKind::Concept);
        inline.pref_label.insert("de".into(), "eins".into());
        let standalone = VocabItem::new("http://example.org/hashVocab/other", ItemKind::Concept);
        (scheme, inline, standalone)
    }

    #[test]
    fn hash_uri_concepts_are_embedded_not_standalone() {
        let (scheme, inline, standalone) = scheme_with_hash_members();
        let mut claimed = HashSet::new();
        let plan = plan_scheme(&scheme, &[&inline, &standalone], &mut claimed).unwrap();

        assert_eq!(plan.standalone, vec!["http://example.org/hashVocab/other"]);
        assert_eq!(plan.embedded.len(), 1);
        assert_eq!(plan.embedded[0].id, "http://example.org/hashVocab#concept1");
    }

    #[test]
    fn first_scheme_in_discovery_order_wins_the_embedding() {
        let (scheme, inline, _) = scheme_with_hash_members();
        let mut claimed = HashSet::new();
        let first = plan_scheme(&scheme, &[&inline], &mut claimed).unwrap();
        let second = plan_scheme(&scheme, &[&inline], &mut claimed).unwrap();
        assert_eq!(first.embedded.len(), 1);
        assert!(second.embedded.is_empty());
    }

    #[test]
    fn plain_and_linked_data_forms_carry_identical_values() {
        let mut item = VocabItem::new("http://example.org/vocab/1", ItemKind::Concept);
        item.pref_label.insert("de".into(), "Hund".into());
        item.notation = vec!["1".into()];

        let plain = record_json(&item).unwrap();
        let mut linked = record_json_ld(&item).unwrap();

        let object = linked.as_object_mut().unwrap();
        assert!(object.remove("@context").is_some());
        assert_eq!(&plain, &linked);
    }

    #[test]
    fn scheme_record_appends_embedded_concepts() {
        let (scheme, inline, _) = scheme_with_hash_members();
        let mut claimed = HashSet::new();
        let plan = plan_scheme(&scheme, &[&inline], &mut claimed).unwrap();

        let json = scheme_record(&scheme, &plan.embedded, false).unwrap();
        let embedded = json["embeddedConcepts"].as_array().unwrap();
        assert_eq!(embedded.len(), 1);
        assert_eq!(
            embedded[0]["id"],
            "http://example.org/hashVocab#concept1"
        );
        assert!(embedded[0].get("@context").is_none());

        let json_ld = scheme_record(&scheme, &plan.embedded, true).unwrap();
        assert!(json_ld["embeddedConcepts"][0].get("@context").is_some());
        assert!(json_ld.get("@context").is_some());
    }
}
