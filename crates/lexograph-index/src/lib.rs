//! Multilingual full-text indexing over compacted vocabulary records.
//!
//! One [`SearchIndex`] per (concept scheme, language) pair. The index is a
//! lightweight inverted index over concept documents:
//!
//! - One document per member concept per language, containing `id`,
//!   `notation`, and each label field only when the concept actually has a
//!   non-empty value in that language. Absent fields are omitted entirely,
//!   never emitted as empty strings.
//! - A concept with no populated label fields still receives a document: it
//!   stays searchable by notation.
//!
//! Tokenization is deterministic and intentionally simple: Unicode-aware
//! lowercasing, split on non-alphanumeric characters, no stopwords (label
//! text is short multilingual phrases), single-character tokens kept so
//! one-character notations remain findable.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

use lexograph_vocab::{Iri, VocabItem};

// ============================================================================
// Language discovery
// ============================================================================

/// Languages actually present in a concept scheme's tree.
///
/// Walks the scheme and its transitive descendants (via `hasTopConcept` and
/// `narrower`), collecting every language tag that carries a non-empty value
/// in `title`, `prefLabel`, `altLabel` or `hiddenLabel`. A tag with an empty
/// value for one property may still count through another property on the
/// same item. Cycle-safe.
pub fn discover_languages(
    scheme: &VocabItem,
    records: &HashMap<Iri, VocabItem>,
) -> BTreeSet<String> {
    let mut languages = BTreeSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&VocabItem> = vec![scheme];

    while let Some(item) = stack.pop() {
        if !visited.insert(item.id.as_str()) {
            continue;
        }
        collect_languages(item, &mut languages);
        for child in item.has_top_concept.iter().chain(item.narrower.iter()) {
            if let Some(record) = records.get(child) {
                stack.push(record);
            }
        }
    }
    languages
}

fn collect_languages(item: &VocabItem, languages: &mut BTreeSet<String>) {
    for (tag, value) in item.title.iter().chain(item.pref_label.iter()) {
        if !value.is_empty() {
            languages.insert(tag.clone());
        }
    }
    for (tag, values) in item.alt_label.iter().chain(item.hidden_label.iter()) {
        if values.iter().any(|v| !v.is_empty()) {
            languages.insert(tag.clone());
        }
    }
}

// ============================================================================
// Index documents
// ============================================================================

/// One concept, resolved to a single target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    pub id: Iri,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_label: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_label: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl IndexDocument {
    /// Resolve one concept to `language`. Fields with no non-empty value in
    /// that language are left out of the document.
    pub fn resolve(concept: &VocabItem, language: &str) -> IndexDocument {
        let single = |map: &lexograph_vocab::LangMap| {
            map.get(language).filter(|v| !v.is_empty()).cloned()
        };
        let multi = |map: &lexograph_vocab::LangMultiMap| {
            map.get(language)
                .map(|values| {
                    values
                        .iter()
                        .filter(|v| !v.is_empty())
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        };
        IndexDocument {
            id: concept.id.clone(),
            notation: concept.notation.clone(),
            pref_label: single(&concept.pref_label),
            alt_label: multi(&concept.alt_label),
            hidden_label: multi(&concept.hidden_label),
            definition: single(&concept.definition),
            example: single(&concept.example),
        }
    }

    fn searchable_text(&self) -> impl Iterator<Item = &str> {
        self.notation
            .iter()
            .map(String::as_str)
            .chain(self.pref_label.as_deref())
            .chain(self.alt_label.iter().map(String::as_str))
            .chain(self.hidden_label.iter().map(String::as_str))
            .chain(self.definition.as_deref())
            .chain(self.example.as_deref())
    }
}

// ============================================================================
// Search index
// ============================================================================

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to serialize index chunk {chunk}: {source}")]
    Serialize {
        chunk: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Inverted full-text index for one (scheme, language) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    pub language: String,
    pub documents: Vec<IndexDocument>,
    /// token → sorted document ordinals into `documents`.
    pub terms: BTreeMap<String, Vec<u32>>,
}

impl SearchIndex {
    pub fn new(language: impl Into<String>) -> Self {
        SearchIndex {
            language: language.into(),
            documents: Vec::new(),
            terms: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, document: IndexDocument) {
        let ordinal = self.documents.len() as u32;
        let mut tokens: BTreeSet<String> = BTreeSet::new();
        for text in document.searchable_text() {
            tokens.extend(tokenize(text));
        }
        for token in tokens {
            self.terms.entry(token).or_default().push(ordinal);
        }
        self.documents.push(document);
    }

    /// Ids of documents matching any token of `query`, in document order.
    pub fn query(&self, query: &str) -> Vec<&str> {
        let mut hits: BTreeSet<u32> = BTreeSet::new();
        for token in tokenize(query) {
            if let Some(ordinals) = self.terms.get(&token) {
                hits.extend(ordinals.iter().copied());
            }
        }
        hits.into_iter()
            .map(|ordinal| self.documents[ordinal as usize].id.as_str())
            .collect()
    }

    /// Exportable chunks, keyed for the output path space
    /// (`{schemePath}/search/{language}/{chunkKey}`). A chunk with no
    /// payload exports the empty string.
    pub fn export(&self) -> Result<Vec<(String, String)>, IndexError> {
        let documents = if self.documents.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&self.documents).map_err(|source| IndexError::Serialize {
                chunk: "documents.json",
                source,
            })?
        };
        let terms = if self.terms.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&self.terms).map_err(|source| IndexError::Serialize {
                chunk: "terms.json",
                source,
            })?
        };
        Ok(vec![
            ("documents.json".to_string(), documents),
            ("terms.json".to_string(), terms),
        ])
    }
}

/// Build the index for one language over a scheme's member concepts.
///
/// Membership is as recorded on the concepts (`inSchemeAll`), decided by the
/// caller; there is no recursive closure here.
pub fn build_index(language: &str, members: &[&VocabItem]) -> SearchIndex {
    let mut index = SearchIndex::new(language);
    for concept in members {
        index.add(IndexDocument::resolve(concept, language));
    }
    index
}

/// Build one index per language of the scheme's discovered set.
pub fn build_indexes(
    languages: &BTreeSet<String>,
    members: &[&VocabItem],
) -> BTreeMap<String, SearchIndex> {
    languages
        .iter()
        .map(|language| (language.clone(), build_index(language, members)))
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
