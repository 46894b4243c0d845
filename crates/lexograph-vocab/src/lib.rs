//! Lexograph vocabulary model
//!
//! This crate defines the typed record form that the rest of the pipeline
//! produces and consumes:
//!
//! - [`VocabItem`]: one compacted record per graph node (concept, concept
//!   scheme or collection) with derived navigation fields.
//! - [`context`]: the fixed SKOS property context (IRI → short name) the
//!   compactor compacts against, plus the JSON-LD `@context` used for the
//!   linked-data serialization.
//! - [`paths`]: pure IRI → output-path mapping used by every downstream
//!   component.
//!
//! Nothing in here performs I/O; records are plain serde values.

pub mod context;
pub mod item;
pub mod paths;

pub use item::{ItemKind, LangMap, LangMultiMap, VocabItem};

/// Internationalized resource identifier, the stable key naming every
/// vocabulary entity. Kept as a plain string; the pipeline never resolves
/// or normalizes IRIs beyond identity.
pub type Iri = String;
