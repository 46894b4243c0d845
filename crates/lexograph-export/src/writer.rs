//! Artifact persistence.
//!
//! Writes are overwrite-in-place and independent of each other, so callers
//! may issue them concurrently; every call returns a `Result` the
//! orchestrator must collect before the build may report success. A write
//! failure carries the offending path and is never merely logged.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Persists artifacts under a configurable output root.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactWriter { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one artifact at a root-relative path (IRI-derived paths start
    /// with `/`). Parent directories are created on demand.
    pub fn write(&self, rel_path: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        let target = self.root.join(rel_path.trim_start_matches('/'));

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::Io {
                path: target.clone(),
                source,
            })?;
        }
        std::fs::write(&target, bytes).map_err(|source| WriteError::Io {
            path: target.clone(),
            source,
        })?;
        tracing::debug!(path = %target.display(), bytes = bytes.len(), "wrote artifact");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_create_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let written = writer
            .write("/w3id.org/class/x/1.json", b"{\"id\":\"1\"}")
            .unwrap();
        assert!(written.starts_with(dir.path()));
        assert_eq!(
            std::fs::read_to_string(written).unwrap(),
            "{\"id\":\"1\"}"
        );
    }

    #[test]
    fn writes_are_idempotent_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        writer.write("/a/b.json", b"first").unwrap();
        let written = writer.write("/a/b.json", b"second").unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), "second");
    }

    #[test]
    fn empty_payloads_are_permitted() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let written = writer.write("/s/search/de/terms.json", b"").unwrap();
        assert_eq!(std::fs::metadata(written).unwrap().len(), 0);
    }

    #[test]
    fn failures_surface_the_offending_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        // A file where a directory is needed makes create_dir_all fail.
        writer.write("/blocked", b"x").unwrap();

        let result = writer.write("/blocked/child.json", b"x");
        match result {
            Err(WriteError::Io { path, .. }) => {
                assert!(path.ends_with("blocked/child.json"));
            }
            Ok(_) => panic!("expected a write failure"),
        }
    }
}
