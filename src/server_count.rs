//! One-shot server count read from the document store.
//!
//! The bot keeps a denormalized counter in a document (by default
//! `botStats/serverCount`, field `count`). Reading it is best effort: any
//! failure renders as [`ServerCount::Unknown`], never as zero.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use pulsewatch_types::ServerCount;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Default document holding the server count.
pub const SERVER_COUNT_DOCUMENT: &str = "botStats/serverCount";

/// Field of the document holding the count.
pub const COUNT_FIELD: &str = "count";

/// Errors that can occur when reading a document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document could not be read.
    #[error("Read error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON.
    #[error("Parse error for {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document path is empty or escapes the store.
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
}

/// Read access to a document database.
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Fetch the document at `path` (e.g. "botStats/serverCount").
    ///
    /// Returns `Ok(None)` if the document does not exist.
    fn get_value(&self, path: &str) -> Result<Option<Value>, StoreError>;
}

/// A document store backed by a directory of JSON files.
///
/// Document `a/b` lives at `<root>/a/b.json`.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_file(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path.trim_matches('/'));
        let well_formed = !path.trim_matches('/').is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !well_formed {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative).with_extension("json"))
    }
}

impl DocumentStore for FileDocumentStore {
    fn get_value(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let file = self.document_file(path)?;
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map(Some).map_err(|source| StoreError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// An in-memory document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: BTreeMap<String, Value>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn insert(&mut self, path: &str, document: Value) {
        self.documents.insert(path.to_string(), document);
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get_value(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.get(path).cloned())
    }
}

/// Read the server count, treating every failure as unknown.
pub fn read_server_count(store: &dyn DocumentStore, path: &str) -> ServerCount {
    match store.get_value(path) {
        Ok(Some(document)) => {
            let count = count_from_document(&document);
            if count == ServerCount::Unknown {
                debug!("Document {} has no numeric {} field", path, COUNT_FIELD);
            }
            count
        }
        Ok(None) => {
            debug!("Document {} does not exist", path);
            ServerCount::Unknown
        }
        Err(e) => {
            warn!("Failed to read server count: {}", e);
            ServerCount::Unknown
        }
    }
}

fn count_from_document(document: &Value) -> ServerCount {
    document.get(COUNT_FIELD).and_then(Value::as_u64).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_count() {
        let mut store = MemoryDocumentStore::new();
        store.insert(SERVER_COUNT_DOCUMENT, json!({"count": 1523}));

        assert_eq!(read_server_count(&store, SERVER_COUNT_DOCUMENT), ServerCount::Known(1523));
    }

    #[test]
    fn test_missing_document_is_unknown() {
        let store = MemoryDocumentStore::new();
        assert_eq!(read_server_count(&store, SERVER_COUNT_DOCUMENT), ServerCount::Unknown);
    }

    #[test]
    fn test_non_numeric_count_is_unknown() {
        let mut store = MemoryDocumentStore::new();
        store.insert("a", json!({"count": "12"}));
        store.insert("b", json!({"total": 12}));
        store.insert("c", json!({"count": -4}));
        store.insert("d", json!({"count": null}));

        for path in ["a", "b", "c", "d"] {
            assert_eq!(read_server_count(&store, path), ServerCount::Unknown, "{}", path);
        }
    }

    #[test]
    fn test_zero_is_known() {
        let mut store = MemoryDocumentStore::new();
        store.insert(SERVER_COUNT_DOCUMENT, json!({"count": 0}));
        assert_eq!(read_server_count(&store, SERVER_COUNT_DOCUMENT), ServerCount::Known(0));
    }

    #[test]
    fn test_file_store_reads_nested_document() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("botStats")).unwrap();
        fs::write(dir.path().join("botStats/serverCount.json"), r#"{"count": 88}"#).unwrap();

        let store = FileDocumentStore::new(dir.path());
        assert_eq!(
            store.get_value(SERVER_COUNT_DOCUMENT).unwrap(),
            Some(json!({"count": 88}))
        );
        assert_eq!(read_server_count(&store, SERVER_COUNT_DOCUMENT), ServerCount::Known(88));
    }

    #[test]
    fn test_file_store_missing_document() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path());
        assert!(store.get_value(SERVER_COUNT_DOCUMENT).unwrap().is_none());
    }

    #[test]
    fn test_file_store_parse_error_is_unknown() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("botStats")).unwrap();
        fs::write(dir.path().join("botStats/serverCount.json"), "{not json").unwrap();

        let store = FileDocumentStore::new(dir.path());
        assert!(matches!(
            store.get_value(SERVER_COUNT_DOCUMENT),
            Err(StoreError::Parse { .. })
        ));
        assert_eq!(read_server_count(&store, SERVER_COUNT_DOCUMENT), ServerCount::Unknown);
    }

    #[test]
    fn test_file_store_rejects_escaping_paths() {
        let store = FileDocumentStore::new("/tmp");
        assert!(matches!(store.get_value("../etc/passwd"), Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.get_value(""), Err(StoreError::InvalidPath(_))));
    }
}
