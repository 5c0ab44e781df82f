//! Persisted event corpus access.
//!
//! The corpus is a directory tree of front-matter markdown documents, one per
//! event, with the filesystem path as document identity.  The engine only
//! reads the tree to build indexes and conditionally rewrites single
//! documents during merges; it never deletes anything.

pub mod document;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

pub use document::Document;

/// Read access to the persisted event corpus.
#[derive(Clone, Debug)]
pub struct EventStore {
    root: PathBuf,
}

impl EventStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse every event document under the root.
    ///
    /// Index files (names starting with `_`) are skipped; unreadable or
    /// malformed documents are logged and skipped so one bad file never
    /// blocks indexing the rest of the corpus.  A missing root is treated as
    /// an empty corpus.
    pub fn scan(&self) -> Vec<(PathBuf, Document)> {
        if !self.root.exists() {
            warn!("Content directory not found: {}", self.root.display());
            return Vec::new();
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(".md") || name.starts_with('_') {
                continue;
            }
            let path = entry.path().to_path_buf();
            let parsed = fs::read_to_string(&path)
                .map_err(crate::errors::EngineError::from)
                .and_then(|text| document::parse(&text));
            match parsed {
                Ok(doc) => documents.push((path, doc)),
                Err(e) => warn!("Failed to index {}: {e}", path.display()),
            }
        }
        documents
    }
}
