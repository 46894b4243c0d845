//! Integration tests for the complete Lexograph pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Ingestion → inverse completion → compaction
//! - Language discovery → per-(scheme, language) indexing
//! - Embedding plan → artifact writing
//!
//! Run with: cargo test --test integration_tests

use std::collections::{HashMap, HashSet};

use lexograph_export::{plan_scheme, record_json, record_json_ld, scheme_record, ArtifactWriter};
use lexograph_index::{build_indexes, discover_languages};
use lexograph_ingest::{compact, parse_graph, GraphFormat, LanguageRegistry};
use lexograph_vocab::{paths, Iri, ItemKind, VocabItem};

const VOCAB_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix dct: <http://purl.org/dc/terms/> .

<http://example.org/tree/> a skos:ConceptScheme ;
    dct:title "Baumarten"@de , "Tree species"@en ;
    skos:hasTopConcept <http://example.org/tree/oak> .

<http://example.org/tree/oak> a skos:Concept ;
    skos:prefLabel "Eiche"@de , "Oak"@en ;
    skos:notation "Q" ;
    skos:topConceptOf <http://example.org/tree/> ;
    skos:inScheme <http://example.org/tree/> ;
    skos:narrower <http://example.org/tree/holm-oak> .

<http://example.org/tree/holm-oak> a skos:Concept ;
    skos:prefLabel "Steineiche"@de ;
    skos:altLabel "Stein-Eiche"@de ;
    skos:inScheme <http://example.org/tree/> .
"#;

const HASH_VOCAB_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix dct: <http://purl.org/dc/terms/> .

<http://example.org/hash#> a skos:ConceptScheme ;
    dct:title "Hash vocabulary"@en ;
    skos:hasTopConcept <http://example.org/hash#c1> .

<http://example.org/hash#c1> a skos:Concept ;
    skos:prefLabel "first"@en ;
    skos:topConceptOf <http://example.org/hash#> .
"#;

fn compact_records(ttl: &str) -> (Vec<VocabItem>, LanguageRegistry) {
    let mut languages = LanguageRegistry::new();
    let store = parse_graph(ttl, GraphFormat::Turtle, &mut languages).expect("should parse");
    (compact(&store), languages)
}

fn by_id(records: &[VocabItem]) -> HashMap<Iri, VocabItem> {
    records.iter().map(|r| (r.id.clone(), r.clone())).collect()
}

// ============================================================================
// Ingestion → compaction
// ============================================================================

#[test]
fn test_pipeline_compacts_typed_records_with_derived_fields() {
    let (records, languages) = compact_records(VOCAB_TTL);
    assert_eq!(records.len(), 3);

    let oak = records
        .iter()
        .find(|r| r.id == "http://example.org/tree/oak")
        .unwrap();
    assert_eq!(oak.kind, ItemKind::Concept);
    assert_eq!(oak.in_scheme_all, vec!["http://example.org/tree/"]);
    assert_eq!(oak.children, vec!["http://example.org/tree/holm-oak"]);

    // The inverse of narrower supplies the child's parent.
    let holm = records
        .iter()
        .find(|r| r.id == "http://example.org/tree/holm-oak")
        .unwrap();
    assert_eq!(holm.parent.as_deref(), Some("http://example.org/tree/oak"));

    let tags: Vec<&str> = languages.tags().iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["de", "en"]);
}

#[test]
fn test_every_record_satisfies_the_children_invariant() {
    let (records, _) = compact_records(VOCAB_TTL);
    for record in &records {
        assert!(!record.children.contains(&record.id));
    }
}

// ============================================================================
// Language discovery → indexing
// ============================================================================

#[test]
fn test_scheme_indexes_cover_exactly_the_discovered_languages() {
    let (records, _) = compact_records(VOCAB_TTL);
    let records = by_id(&records);
    let scheme = &records["http://example.org/tree/"];

    let languages = discover_languages(scheme, &records);
    let tags: Vec<&str> = languages.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["de", "en"]);

    let members: Vec<&VocabItem> = records
        .values()
        .filter(|r| r.in_scheme_all.contains(&scheme.id))
        .collect();
    let indexes = build_indexes(&languages, &members);
    assert_eq!(indexes.len(), 2);

    // holm-oak has no English label: its en document carries only
    // id/notation and it stays findable in German.
    assert_eq!(
        indexes["de"].query("steineiche"),
        vec!["http://example.org/tree/holm-oak"]
    );
    assert!(indexes["en"].query("steineiche").is_empty());
    assert_eq!(indexes["en"].documents.len(), 2);
}

// ============================================================================
// Embedding plan → artifact writing
// ============================================================================

#[test]
fn test_hash_uri_concepts_are_embedded_in_their_scheme_artifact() {
    let (records, _) = compact_records(HASH_VOCAB_TTL);
    let records = by_id(&records);
    let scheme = &records["http://example.org/hash#"];
    let concept = &records["http://example.org/hash#c1"];

    // Both map to the same physical document.
    assert_eq!(
        paths::to_file_path(&scheme.id, None),
        paths::to_file_path(&concept.id, None)
    );

    let mut claimed = HashSet::new();
    let plan = plan_scheme(scheme, &[concept], &mut claimed).unwrap();
    assert!(plan.standalone.is_empty());
    assert_eq!(plan.embedded.len(), 1);

    let json = scheme_record(scheme, &plan.embedded, false).unwrap();
    assert_eq!(
        json["embeddedConcepts"][0]["id"],
        "http://example.org/hash#c1"
    );
}

#[test]
fn test_plain_and_linked_data_forms_round_trip_identical_values() {
    let (records, _) = compact_records(VOCAB_TTL);
    for record in &records {
        let plain = record_json(record).unwrap();
        let mut linked = record_json_ld(record).unwrap();
        linked.as_object_mut().unwrap().remove("@context").unwrap();
        assert_eq!(plain, linked);
    }
}

#[test]
fn test_artifacts_land_in_the_iri_derived_path_space() {
    let (records, _) = compact_records(VOCAB_TTL);
    let out = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(out.path());

    for record in &records {
        let body = serde_json::to_string(&record_json(record).unwrap()).unwrap();
        writer
            .write(
                &paths::to_file_path(&record.id, Some("json")),
                body.as_bytes(),
            )
            .unwrap();
    }

    assert!(out.path().join("example.org/tree/index.json").is_file());
    assert!(out.path().join("example.org/tree/oak.json").is_file());
    assert!(out.path().join("example.org/tree/holm-oak.json").is_file());
}
