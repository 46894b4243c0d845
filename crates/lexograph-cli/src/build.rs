//! Build orchestration.
//!
//! The pipeline, per source file: parse → inverse completion → compact →
//! merge into the build's record table. Files are ingested sequentially
//! (later files may define schemes referenced by earlier ones); the
//! (scheme × language) index product and the artifact writes run in
//! parallel. Every write result is collected before the build reports
//! success; there is no partial publish.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use lexograph_export::{
    plan_scheme, record_json, record_json_ld, scheme_record, ArtifactWriter, ExportError,
    SchemePlan, WriteError,
};
use lexograph_index::{build_index, discover_languages, IndexError};
use lexograph_ingest::{compact, parse_graph_file, IngestError, LanguageRegistry};
use lexograph_vocab::{paths, Iri, ItemKind, VocabItem};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory tree of serialized RDF graph files.
    pub data_dir: PathBuf,
    /// Output root for all artifacts.
    pub out_dir: PathBuf,
    /// Source file extension to pick up.
    pub extension: String,
    /// Compact JSON output instead of pretty-printed.
    pub compact_json: bool,
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// Missing or empty source directory. Fatal at startup.
    #[error("{message}")]
    Config { message: String },
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("failed to render artifact: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub source_files: usize,
    pub records: usize,
    pub schemes: usize,
    pub collections: usize,
    pub artifacts_written: usize,
    /// All language tags seen on any literal, merged across files.
    pub languages: BTreeSet<String>,
}

/// Run a full build: ingest every source file, compact, discover languages,
/// index, and persist all artifacts.
pub fn run(options: &BuildOptions) -> Result<BuildSummary, BuildError> {
    let files = collect_source_files(options)?;
    info!(files = files.len(), "starting vocabulary build");

    // Pass 1: sequential ingestion and compaction, last-write-wins by IRI.
    let mut languages = LanguageRegistry::new();
    let mut order: Vec<Iri> = Vec::new();
    let mut records: HashMap<Iri, VocabItem> = HashMap::new();
    let mut scheme_ids: Vec<Iri> = Vec::new();

    for file in &files {
        debug!(file = %file.display(), "ingesting");
        let mut file_languages = LanguageRegistry::new();
        let store = parse_graph_file(file, &mut file_languages)?;
        languages.merge(file_languages);
        for item in compact(&store) {
            if item.kind == ItemKind::ConceptScheme && !scheme_ids.contains(&item.id) {
                scheme_ids.push(item.id.clone());
            }
            let id = item.id.clone();
            if records.insert(id.clone(), item).is_none() {
                order.push(id);
            }
        }
    }

    // Per-scheme language discovery, stamped onto the scheme records.
    let mut scheme_languages: BTreeMap<Iri, BTreeSet<String>> = BTreeMap::new();
    for scheme_id in &scheme_ids {
        let discovered = discover_languages(&records[scheme_id], &records);
        scheme_languages.insert(scheme_id.clone(), discovered.clone());
        if let Some(scheme) = records.get_mut(scheme_id) {
            scheme.languages = Some(discovered);
        }
    }

    let mut summary = BuildSummary {
        source_files: files.len(),
        records: records.len(),
        schemes: scheme_ids.len(),
        languages: languages.tags().clone(),
        ..BuildSummary::default()
    };

    // Artifact planning: records first, then the index chunks.
    let mut artifacts: Vec<(String, String)> = Vec::new();
    let mut emitted: HashSet<Iri> = HashSet::new();
    let mut claimed: HashSet<Iri> = HashSet::new();

    for item in order.iter().filter_map(|id| records.get(id)) {
        if item.kind == ItemKind::Collection {
            summary.collections += 1;
            push_record_artifacts(&mut artifacts, item, options.compact_json)?;
        }
    }

    let scheme_members = member_table(&order, &records, &scheme_ids);
    let mut index_tasks: Vec<(Iri, String)> = Vec::new();

    for scheme_id in &scheme_ids {
        let scheme = &records[scheme_id];
        let members: Vec<&VocabItem> = scheme_members[scheme_id]
            .iter()
            .filter_map(|id| records.get(id))
            .collect();
        let plan = plan_scheme(scheme, &members, &mut claimed)?;
        debug!(
            scheme = %scheme_id,
            members = members.len(),
            embedded = plan.embedded.len(),
            "planned scheme artifacts"
        );

        for concept_id in &plan.standalone {
            if emitted.insert(concept_id.clone()) {
                push_record_artifacts(&mut artifacts, &records[concept_id], options.compact_json)?;
            }
        }
        push_scheme_artifacts(&mut artifacts, scheme, &plan, options.compact_json)?;

        for language in &scheme_languages[scheme_id] {
            index_tasks.push((scheme_id.clone(), language.clone()));
        }
    }

    // The (scheme × language) product is embarrassingly parallel: records
    // are immutable once compacted.
    let index_artifacts: Vec<Vec<(String, String)>> = index_tasks
        .par_iter()
        .map(|(scheme_id, language)| {
            let members: Vec<&VocabItem> = scheme_members[scheme_id]
                .iter()
                .filter_map(|id| records.get(id))
                .collect();
            let index = build_index(language, &members);
            let scheme_path = paths::to_file_path(scheme_id, None);
            let chunks = index
                .export()?
                .into_iter()
                .map(|(key, payload)| {
                    (format!("{scheme_path}/search/{language}/{key}"), payload)
                })
                .collect();
            Ok(chunks)
        })
        .collect::<Result<_, BuildError>>()?;
    artifacts.extend(index_artifacts.into_iter().flatten());

    // Writes are independent and idempotent; issue them concurrently but
    // collect every result before reporting success.
    let writer = ArtifactWriter::new(&options.out_dir);
    artifacts
        .par_iter()
        .map(|(path, content)| writer.write(path, content.as_bytes()).map(|_| ()))
        .collect::<Result<Vec<()>, WriteError>>()?;
    summary.artifacts_written = artifacts.len();

    info!(
        records = summary.records,
        schemes = summary.schemes,
        artifacts = summary.artifacts_written,
        "build complete"
    );
    Ok(summary)
}

/// Source files under the data directory, sorted for deterministic order.
fn collect_source_files(options: &BuildOptions) -> Result<Vec<PathBuf>, BuildError> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&options.data_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(&options.extension))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(BuildError::Config {
            message: format!(
                "no .{} files found under {}; add vocabulary sources to the data directory",
                options.extension,
                options.data_dir.display()
            ),
        });
    }
    Ok(files)
}

/// Concept membership per scheme, in record traversal order. Membership is
/// as recorded on the concept (`inSchemeAll`), no recursive closure.
fn member_table(
    order: &[Iri],
    records: &HashMap<Iri, VocabItem>,
    scheme_ids: &[Iri],
) -> HashMap<Iri, Vec<Iri>> {
    let mut table: HashMap<Iri, Vec<Iri>> = scheme_ids
        .iter()
        .map(|id| (id.clone(), Vec::new()))
        .collect();
    for id in order {
        let Some(item) = records.get(id) else { continue };
        if item.kind != ItemKind::Concept {
            continue;
        }
        for scheme_id in &item.in_scheme_all {
            if let Some(members) = table.get_mut(scheme_id) {
                members.push(id.clone());
            }
        }
    }
    table
}

fn push_record_artifacts(
    artifacts: &mut Vec<(String, String)>,
    item: &VocabItem,
    compact_json: bool,
) -> Result<(), BuildError> {
    let json = render(&record_json(item)?, compact_json)?;
    let json_ld = render(&record_json_ld(item)?, compact_json)?;
    artifacts.push((paths::to_file_path(&item.id, Some("json")), json));
    artifacts.push((paths::to_file_path(&item.id, Some("jsonld")), json_ld));
    Ok(())
}

fn push_scheme_artifacts(
    artifacts: &mut Vec<(String, String)>,
    scheme: &VocabItem,
    plan: &SchemePlan,
    compact_json: bool,
) -> Result<(), BuildError> {
    let json = render(&scheme_record(scheme, &plan.embedded, false)?, compact_json)?;
    let json_ld = render(&scheme_record(scheme, &plan.embedded, true)?, compact_json)?;
    artifacts.push((paths::to_file_path(&scheme.id, Some("json")), json));
    artifacts.push((paths::to_file_path(&scheme.id, Some("jsonld")), json_ld));
    Ok(())
}

fn render(value: &serde_json::Value, compact_json: bool) -> Result<String, BuildError> {
    let rendered = if compact_json {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCAB_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix dct: <http://purl.org/dc/terms/> .

<http://example.org/vocab/> a skos:ConceptScheme ;
    dct:title "Beispiel"@de ;
    dct:title "Example"@fr ;
    skos:hasTopConcept <http://example.org/vocab/1> .

<http://example.org/vocab/1> a skos:Concept ;
    skos:prefLabel "eins"@de ;
    skos:notation "1" ;
    skos:topConceptOf <http://example.org/vocab/> .
"#;

    fn options(data_dir: &std::path::Path, out_dir: &std::path::Path) -> BuildOptions {
        BuildOptions {
            data_dir: data_dir.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            extension: "ttl".to_string(),
            compact_json: false,
        }
    }

    #[test]
    fn empty_data_directory_is_a_configuration_error() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let result = run(&options(data.path(), out.path()));
        assert!(matches!(result, Err(BuildError::Config { .. })));
    }

    #[test]
    fn malformed_source_aborts_the_build_without_output() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join("bad.ttl"), "<broken> <turtle").unwrap();

        let result = run(&options(data.path(), out.path()));
        assert!(matches!(result, Err(BuildError::Ingest(_))));
        assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn builds_records_and_index_chunks_per_language() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join("vocab.ttl"), VOCAB_TTL).unwrap();

        let summary = run(&options(data.path(), out.path())).unwrap();
        assert_eq!(summary.source_files, 1);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.schemes, 1);

        let root = out.path().join("example.org/vocab");
        assert!(root.join("index.json").is_file());
        assert!(root.join("index.jsonld").is_file());
        assert!(root.join("1.json").is_file());

        // Discovered languages are de (scheme + concept) and fr (scheme
        // title only); exactly those get index chunks.
        let search = root.join("index/search");
        assert!(search.join("de/documents.json").is_file());
        assert!(search.join("fr/documents.json").is_file());
        assert_eq!(std::fs::read_dir(&search).unwrap().count(), 2);
    }

    #[test]
    fn nested_source_files_are_discovered_in_sorted_order() {
        let data = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(data.path().join("nested")).unwrap();
        std::fs::write(data.path().join("nested/vocab.ttl"), VOCAB_TTL).unwrap();
        std::fs::write(data.path().join("notes.txt"), "not a vocabulary").unwrap();

        let opts = options(data.path(), data.path());
        let files = collect_source_files(&opts).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("nested/vocab.ttl"));
    }
}
