//! Document store persisted to a local JSON snapshot.
//!
//! The whole store is loaded into a [`MemoryDocumentStore`] at open and the
//! snapshot file is rewritten after every successful write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{
    CollectionPath, DocPath, Document, DocumentStore, Fields, MemoryDocumentStore, RemoteError,
    Snapshot,
};

/// File-backed document store for local development and the CLI.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryDocumentStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Io` if the file can't be read and
    /// `RemoteError::Decode` if it isn't a valid snapshot.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RemoteError> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice::<Snapshot>(&bytes).map_err(|source| {
                    RemoteError::Decode {
                        path: path.display().to_string(),
                        source,
                    }
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::new(),
            Err(e) => return Err(RemoteError::Io(e)),
        };

        debug!(path = %path.display(), collections = snapshot.len(), "Opened document store");

        Ok(Self {
            path,
            inner: MemoryDocumentStore::from_snapshot(snapshot),
        })
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self) -> Result<(), RemoteError> {
        let snapshot = self.inner.snapshot().await;
        let bytes = serde_json::to_vec_pretty(&snapshot).map_err(|source| RemoteError::Decode {
            path: self.path.display().to_string(),
            source,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, RemoteError> {
        self.inner.get(path).await
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, RemoteError> {
        self.inner.list(collection).await
    }

    async fn query_eq(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, RemoteError> {
        self.inner.query_eq(collection, field, value).await
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, RemoteError> {
        let id = self.inner.add(collection, fields).await?;
        self.flush().await?;
        Ok(id)
    }

    async fn set(&self, path: &DocPath, fields: Fields) -> Result<(), RemoteError> {
        self.inner.set(path, fields).await?;
        self.flush().await
    }

    async fn update(&self, path: &DocPath, fields: Fields) -> Result<(), RemoteError> {
        self.inner.update(path, fields).await?;
        self.flush().await
    }

    async fn delete(&self, path: &DocPath) -> Result<(), RemoteError> {
        self.inner.delete(path).await?;
        self.flush().await
    }

    async fn increment(&self, path: &DocPath, field: &str, delta: i64) -> Result<(), RemoteError> {
        self.inner.increment(path, field, delta).await?;
        self.flush().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json"))
            .await
            .unwrap();
        let products = CollectionPath::new("products");
        assert!(store.list(&products).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("store.json");
        let orders = CollectionPath::new("orders");

        let id = {
            let store = JsonFileStore::open(&file).await.unwrap();
            let mut fields = Fields::new();
            fields.insert("userId".to_owned(), Value::from("GUEST"));
            store.add(&orders, fields).await.unwrap()
        };

        let reopened = JsonFileStore::open(&file).await.unwrap();
        let doc = reopened.get(&orders.doc(id)).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("userId"), Some(&Value::from("GUEST")));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        tokio::fs::write(&file, b"not json").await.unwrap();

        let result = JsonFileStore::open(&file).await;
        assert!(matches!(result, Err(RemoteError::Decode { .. })));
    }
}
