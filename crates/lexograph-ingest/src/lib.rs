//! RDF ingestion for Lexograph (untrusted boundary).
//!
//! This crate parses one serialized RDF document into a [`TripleStore`] and
//! completes it against the fixed SKOS inverse table: for every parsed triple
//! whose predicate has a declared inverse, the mirrored triple is synthesized
//! into the same store, so downstream navigation never depends on which
//! direction a vocabulary author happened to write.
//!
//! Uses **Sophia** to parse the supported serializations:
//! - Turtle (`.ttl`, `.turtle`)
//! - N-Triples (`.nt`, `.ntriples`)
//!
//! A malformed document is fatal for the whole build; there is no partial
//! output for a file that fails to parse.

pub mod compact;

pub use compact::compact;

use lexograph_vocab::context;
use sophia::api::prelude::*;
// The glob above is shadowed by the local `Triple` struct (below), so bring the
// sophia `Triple` trait into scope anonymously to make its accessor methods
// (`s`/`p`/`o`) resolvable on parsed triples.
use sophia::api::triple::Triple as _;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// RDF term model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfNode {
    Iri(String),
    BlankNode(String),
}

impl RdfNode {
    /// Record id for this node: the IRI itself, or `_:label` for blanks.
    pub fn id(&self) -> String {
        match self {
            RdfNode::Iri(iri) => iri.clone(),
            RdfNode::BlankNode(label) => format!("_:{label}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RdfLiteral {
    pub lexical: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfObject {
    Node(RdfNode),
    Literal(RdfLiteral),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: RdfNode,
    pub predicate: String,
    pub object: RdfObject,
}

// ============================================================================
// Triple store with inverse completion
// ============================================================================

/// Inverse predicate table: asserting one direction implies the other.
/// `related` is its own inverse.
pub const INVERSES: &[(&str, &str)] = &[
    (context::SKOS_NARROWER, context::SKOS_BROADER),
    (context::SKOS_BROADER, context::SKOS_NARROWER),
    (context::SKOS_RELATED, context::SKOS_RELATED),
    (context::SKOS_HAS_TOP_CONCEPT, context::SKOS_TOP_CONCEPT_OF),
    (context::SKOS_TOP_CONCEPT_OF, context::SKOS_HAS_TOP_CONCEPT),
];

pub fn inverse_of(predicate: &str) -> Option<&'static str> {
    INVERSES
        .iter()
        .find(|(forward, _)| *forward == predicate)
        .map(|(_, inverse)| *inverse)
}

/// Triples of one source file's parse pass.
///
/// A set keyed by the full triple tuple that preserves first-insertion
/// order; re-inserting an existing triple is a no-op, which is what makes
/// [`TripleStore::complete_inverses`] idempotent.
#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl TripleStore {
    pub fn new() -> Self {
        TripleStore::default()
    }

    /// Insert a triple; returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Synthesize `(object, inverse(p), subject)` for every stored triple
    /// whose predicate has a declared inverse and whose object is a node.
    /// Idempotent: running completion on a completed store changes nothing.
    pub fn complete_inverses(&mut self) {
        let forward: Vec<Triple> = self
            .triples
            .iter()
            .filter(|t| inverse_of(&t.predicate).is_some())
            .cloned()
            .collect();
        for triple in forward {
            let Some(inverse) = inverse_of(&triple.predicate) else {
                continue;
            };
            let RdfObject::Node(object) = &triple.object else {
                continue;
            };
            self.insert(Triple {
                subject: object.clone(),
                predicate: inverse.to_string(),
                object: RdfObject::Node(triple.subject.clone()),
            });
        }
    }
}

// ============================================================================
// Language registry
// ============================================================================

/// Accumulator for the language tags seen on any literal, threaded through
/// the ingestion calls and merged by the orchestrator. Tags are normalized
/// once on entry: hyphens become underscores (`en-US` → `en_US`), and that
/// normalized form is used consistently across records and indexes.
#[derive(Debug, Default, Clone)]
pub struct LanguageRegistry {
    tags: BTreeSet<String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        LanguageRegistry::default()
    }

    pub fn record(&mut self, tag: &str) {
        self.tags.insert(normalize_language_tag(tag));
    }

    pub fn merge(&mut self, other: LanguageRegistry) {
        self.tags.extend(other.tags);
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

pub fn normalize_language_tag(tag: &str) -> String {
    tag.replace('-', "_")
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Turtle,
    NTriples,
}

impl GraphFormat {
    pub fn from_extension(extension: &str) -> Option<GraphFormat> {
        match extension.to_lowercase().as_str() {
            "ttl" | "turtle" => Some(GraphFormat::Turtle),
            "nt" | "ntriples" => Some(GraphFormat::NTriples),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GraphFormat::Turtle => "Turtle",
            GraphFormat::NTriples => "N-Triples",
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed source graph. Fatal: aborts the whole build.
    #[error("failed to parse {format} graph: {message}")]
    Parse { format: &'static str, message: String },
    #[error("unsupported source format: .{extension}")]
    UnsupportedFormat { extension: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
#[error("{message}")]
struct TermError {
    message: String,
}

impl TermError {
    fn new(message: impl Into<String>) -> Self {
        TermError {
            message: message.into(),
        }
    }
}

/// Parse one serialized RDF document into a completed triple store.
///
/// Language tags seen on literals are collected into `languages`; this is
/// consumer-facing schema state, not part of the record model itself.
pub fn parse_graph(
    text: &str,
    format: GraphFormat,
    languages: &mut LanguageRegistry,
) -> Result<TripleStore, IngestError> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(text.as_bytes()));
    let mut store = TripleStore::new();

    let parsed: Result<(), String> = match format {
        GraphFormat::Turtle => sophia::turtle::parser::turtle::parse_bufread(reader)
            .try_for_each_triple(|t| -> Result<(), TermError> {
                collect_statement(
                    &mut store,
                    languages,
                    &t.s().to_string(),
                    &t.p().to_string(),
                    &t.o().to_string(),
                )
            })
            .map_err(|e| e.to_string()),
        GraphFormat::NTriples => sophia::turtle::parser::nt::parse_bufread(reader)
            .try_for_each_triple(|t| -> Result<(), TermError> {
                collect_statement(
                    &mut store,
                    languages,
                    &t.s().to_string(),
                    &t.p().to_string(),
                    &t.o().to_string(),
                )
            })
            .map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| IngestError::Parse {
        format: format.label(),
        message,
    })?;

    store.complete_inverses();
    tracing::debug!(triples = store.len(), "parsed graph");
    Ok(store)
}

/// Parse a source file, dispatching the format on its extension.
pub fn parse_graph_file(
    path: &Path,
    languages: &mut LanguageRegistry,
) -> Result<TripleStore, IngestError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let format =
        GraphFormat::from_extension(extension).ok_or_else(|| IngestError::UnsupportedFormat {
            extension: extension.to_string(),
        })?;
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(&text, format, languages)
}

/// Collect one parsed statement into the store, recording any literal
/// language tag on the way.
fn collect_statement(
    store: &mut TripleStore,
    languages: &mut LanguageRegistry,
    s: &str,
    p: &str,
    o: &str,
) -> Result<(), TermError> {
    let subject = parse_node_term(s)?;
    let RdfObject::Node(RdfNode::Iri(predicate)) = parse_term(p)? else {
        // Predicates are always IRIs in the supported serializations.
        return Ok(());
    };
    let object = parse_term(o)?;
    if let RdfObject::Literal(literal) = &object {
        if let Some(tag) = &literal.language {
            languages.record(tag);
        }
    }
    store.insert(Triple {
        subject,
        predicate,
        object,
    });
    Ok(())
}

// ============================================================================
// Term parsing (N-Triples-ish display form)
// ============================================================================

fn parse_node_term(term: &str) -> Result<RdfNode, TermError> {
    match parse_term(term)? {
        RdfObject::Node(node) => Ok(node),
        RdfObject::Literal(_) => Err(TermError::new(format!(
            "expected IRI or blank node, got literal: {term}"
        ))),
    }
}

fn parse_term(term: &str) -> Result<RdfObject, TermError> {
    let s = term.trim();

    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfObject::Node(RdfNode::Iri(iri.to_string())));
    }
    if let Some(label) = s.strip_prefix("_:") {
        return Ok(RdfObject::Node(RdfNode::BlankNode(label.to_string())));
    }
    if s.starts_with('"') {
        return parse_literal_term(s);
    }
    Err(TermError::new(format!("unsupported RDF term form: {s}")))
}

fn parse_literal_term(s: &str) -> Result<RdfObject, TermError> {
    let close = closing_quote(s)
        .ok_or_else(|| TermError::new(format!("literal is missing its closing quote: {s}")))?;
    let lexical = unescape_literal(&s[1..close]);
    let rest = s[close + 1..].trim();

    let mut language = None;
    let mut datatype = None;
    if let Some(tag) = rest.strip_prefix('@') {
        language = Some(tag.to_string());
    } else if let Some(dt) = rest.strip_prefix("^^") {
        let dt = dt.trim();
        match dt.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            Some(iri) => datatype = Some(iri.to_string()),
            None if !dt.is_empty() => datatype = Some(dt.to_string()),
            None => {}
        }
    }

    Ok(RdfObject::Literal(RdfLiteral {
        lexical,
        language,
        datatype,
    }))
}

/// Byte offset of the first unescaped closing quote, if any.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            '"' if !escaped => return Some(i),
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    None
}

fn unescape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
