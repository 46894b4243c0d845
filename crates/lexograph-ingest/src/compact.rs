//! Graph-to-record compaction.
//!
//! Expands a completed [`TripleStore`](crate::TripleStore) into typed
//! [`VocabItem`] records against the fixed SKOS property context:
//!
//! - Nodes are grouped by subject in source-graph order.
//! - A node's declared types are narrowed to one kind (Concept >
//!   ConceptScheme > Collection); nodes without a recognized type are
//!   dropped, silently.
//! - Referenced sub-documents are replaced by their IRIs only. One-level
//!   flattening: relation targets are never expanded inside a record.
//! - Derived fields: `children` (narrower ∪ hasTopConcept, display order,
//!   self-reference excluded), `parent` (from broader), `inSchemeAll`
//!   (inScheme ∪ topConceptOf, duplicates removed, first-seen wins).

use std::collections::HashMap;

use lexograph_vocab::{context, ItemKind, VocabItem};

use crate::{normalize_language_tag, RdfLiteral, RdfNode, RdfObject, TripleStore};

#[derive(Debug, Default)]
struct NodeAccumulator {
    type_iris: Vec<String>,
    /// (short property name, literal) in triple order.
    literals: Vec<(&'static str, RdfLiteral)>,
    /// (short property name, referenced id) in triple order.
    references: Vec<(&'static str, String)>,
}

/// Compact a completed triple store into records, in source-graph order.
pub fn compact(store: &TripleStore) -> Vec<VocabItem> {
    let mut order: Vec<&RdfNode> = Vec::new();
    let mut nodes: HashMap<&RdfNode, NodeAccumulator> = HashMap::new();

    for triple in store.iter() {
        let acc = nodes.entry(&triple.subject).or_insert_with(|| {
            order.push(&triple.subject);
            NodeAccumulator::default()
        });

        if triple.predicate == context::RDF_TYPE {
            if let RdfObject::Node(RdfNode::Iri(type_iri)) = &triple.object {
                acc.type_iris.push(type_iri.clone());
            }
            continue;
        }

        let Some(short) = context::property_name(&triple.predicate) else {
            // Properties outside the vocabulary context are not part of the
            // record model.
            continue;
        };
        match &triple.object {
            RdfObject::Node(node) => acc.references.push((short, node.id())),
            RdfObject::Literal(literal) => acc.literals.push((short, literal.clone())),
        }
    }

    order
        .into_iter()
        .filter_map(|subject| build_item(subject, &nodes[subject]))
        .collect()
}

fn build_item(subject: &RdfNode, acc: &NodeAccumulator) -> Option<VocabItem> {
    let kind = ItemKind::from_declared(&acc.type_iris)?;
    let mut item = VocabItem::new(subject.id(), kind);

    for (short, literal) in &acc.literals {
        apply_literal(&mut item, short, literal);
    }
    for (short, target) in &acc.references {
        apply_reference(&mut item, short, target);
    }

    // children: narrower ∪ hasTopConcept in display order, never the item
    // itself, duplicates removed.
    let mut children: Vec<String> = Vec::new();
    for child in item.narrower.iter().chain(item.has_top_concept.iter()) {
        if child != &item.id && !children.contains(child) {
            children.push(child.clone());
        }
    }
    item.children = children;
    item.parent = item.broader.clone();

    // inSchemeAll: inScheme ∪ topConceptOf, first-seen wins.
    let mut in_scheme_all: Vec<String> = Vec::new();
    for scheme in item.in_scheme.iter().chain(item.top_concept_of.iter()) {
        if !in_scheme_all.contains(scheme) {
            in_scheme_all.push(scheme.clone());
        }
    }
    item.in_scheme_all = in_scheme_all;

    Some(item)
}

fn apply_literal(item: &mut VocabItem, short: &str, literal: &RdfLiteral) {
    let language = literal.language.as_deref().map(normalize_language_tag);
    match short {
        // Single value per language; first seen wins. Untagged literals for
        // language-tagged properties carry no addressable translation and
        // are skipped.
        "title" | "prefLabel" | "definition" | "example" => {
            if let Some(lang) = language {
                let map = match short {
                    "title" => &mut item.title,
                    "prefLabel" => &mut item.pref_label,
                    "definition" => &mut item.definition,
                    _ => &mut item.example,
                };
                map.entry(lang).or_insert_with(|| literal.lexical.clone());
            }
        }
        "altLabel" | "hiddenLabel" | "scopeNote" => {
            if let Some(lang) = language {
                let map = match short {
                    "altLabel" => &mut item.alt_label,
                    "hiddenLabel" => &mut item.hidden_label,
                    _ => &mut item.scope_note,
                };
                map.entry(lang).or_default().push(literal.lexical.clone());
            }
        }
        "notation" => item.notation.push(literal.lexical.clone()),
        // Mapping relations may be authored as plain literals; keep them
        // untouched next to the IRI-valued ones.
        "exactMatch" | "closeMatch" | "broadMatch" | "narrowMatch" | "relatedMatch" => {
            push_match(item, short, literal.lexical.clone());
        }
        _ => {}
    }
}

fn apply_reference(item: &mut VocabItem, short: &str, target: &str) {
    let target = target.to_string();
    match short {
        "narrower" => item.narrower.push(target),
        "narrowerTransitive" => item.narrower_transitive.push(target),
        // parent is singular: the first broader reference wins.
        "broader" => {
            if item.broader.is_none() {
                item.broader = Some(target);
            }
        }
        "broaderTransitive" => {
            if item.broader_transitive.is_none() {
                item.broader_transitive = Some(target);
            }
        }
        "related" => item.related.push(target),
        "hasTopConcept" => item.has_top_concept.push(target),
        "topConceptOf" => item.top_concept_of.push(target),
        "inScheme" => item.in_scheme.push(target),
        "member" => item.member.push(target),
        "exactMatch" | "closeMatch" | "broadMatch" | "narrowMatch" | "relatedMatch" => {
            push_match(item, short, target);
        }
        _ => {}
    }
}

fn push_match(item: &mut VocabItem, short: &str, value: String) {
    let list = match short {
        "exactMatch" => &mut item.exact_match,
        "closeMatch" => &mut item.close_match,
        "broadMatch" => &mut item.broad_match,
        "narrowMatch" => &mut item.narrow_match,
        _ => &mut item.related_match,
    };
    list.push(value);
}
