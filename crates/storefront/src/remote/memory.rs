//! In-process document store.
//!
//! Used by tests and as the backing map of [`super::JsonFileStore`]. Failures
//! can be injected per operation kind to exercise partial-failure paths.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CollectionPath, DocPath, Document, DocumentStore, Fields, RemoteError};

/// Full contents of a store: collection path -> document id -> fields.
pub type Snapshot = BTreeMap<String, BTreeMap<String, Fields>>;

/// Operation kinds, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    List,
    Query,
    Add,
    Set,
    Update,
    Delete,
    Increment,
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Snapshot>,
    failing: RwLock<HashSet<Operation>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            collections: RwLock::new(snapshot),
            failing: RwLock::default(),
        }
    }

    /// Copy of the full store contents.
    pub async fn snapshot(&self) -> Snapshot {
        self.collections.read().await.clone()
    }

    /// Make every subsequent `operation` fail with `RemoteError::Unavailable`.
    pub async fn fail_on(&self, operation: Operation) {
        self.failing.write().await.insert(operation);
    }

    /// Stop injecting failures.
    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &CollectionPath) -> usize {
        self.collections
            .read()
            .await
            .get(collection.as_str())
            .map_or(0, BTreeMap::len)
    }

    async fn check(&self, operation: Operation) -> Result<(), RemoteError> {
        if self.failing.read().await.contains(&operation) {
            return Err(RemoteError::Unavailable(format!(
                "injected {operation:?} failure"
            )));
        }
        Ok(())
    }
}

fn to_documents(docs: Option<&BTreeMap<String, Fields>>) -> Vec<Document> {
    docs.map(|docs| {
        docs.iter()
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect()
    })
    .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, RemoteError> {
        self.check(Operation::Get).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(path.collection().as_str())
            .and_then(|docs| docs.get(path.id()))
            .map(|fields| Document {
                id: path.id().to_owned(),
                fields: fields.clone(),
            }))
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, RemoteError> {
        self.check(Operation::List).await?;
        let collections = self.collections.read().await;
        Ok(to_documents(collections.get(collection.as_str())))
    }

    async fn query_eq(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, RemoteError> {
        self.check(Operation::Query).await?;
        let collections = self.collections.read().await;
        let mut docs = to_documents(collections.get(collection.as_str()));
        docs.retain(|doc| doc.fields.get(field) == Some(value));
        Ok(docs)
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, RemoteError> {
        self.check(Operation::Add).await?;
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.as_str().to_owned())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn set(&self, path: &DocPath, fields: Fields) -> Result<(), RemoteError> {
        self.check(Operation::Set).await?;
        self.collections
            .write()
            .await
            .entry(path.collection().as_str().to_owned())
            .or_default()
            .insert(path.id().to_owned(), fields);
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Fields) -> Result<(), RemoteError> {
        self.check(Operation::Update).await?;
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(path.collection().as_str())
            .and_then(|docs| docs.get_mut(path.id()))
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;
        doc.extend(fields);
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), RemoteError> {
        self.check(Operation::Delete).await?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(path.collection().as_str()) {
            docs.remove(path.id());
            if docs.is_empty() {
                collections.remove(path.collection().as_str());
            }
        }
        Ok(())
    }

    async fn increment(&self, path: &DocPath, field: &str, delta: i64) -> Result<(), RemoteError> {
        self.check(Operation::Increment).await?;
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(path.collection().as_str())
            .and_then(|docs| docs.get_mut(path.id()))
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;

        #[allow(clippy::cast_precision_loss)] // Counters never approach 2^52
        let next = match doc.get(field) {
            Some(Value::Number(n)) => n.as_i64().map_or_else(
                || Value::from(n.as_f64().unwrap_or(0.0) + delta as f64),
                |current| Value::from(current + delta),
            ),
            _ => Value::from(delta),
        };
        doc.insert(field.to_owned(), next);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryDocumentStore::new();
        let path = CollectionPath::new("products").doc("p1");

        store
            .set(&path, fields(json!({"name": "Scarf"})))
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.id, "p1");
        assert_eq!(doc.fields.get("name"), Some(&json!("Scarf")));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryDocumentStore::new();
        let path = CollectionPath::new("products").doc("nope");
        assert!(store.get(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let store = MemoryDocumentStore::new();
        let orders = CollectionPath::new("orders");

        let a = store.add(&orders, Fields::new()).await.unwrap();
        let b = store.add(&orders, Fields::new()).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.count(&orders).await, 2);
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_document() {
        let store = MemoryDocumentStore::new();
        let path = CollectionPath::new("products").doc("p1");

        let missing = store.update(&path, fields(json!({"a": 1}))).await;
        assert!(matches!(missing, Err(RemoteError::NotFound(_))));

        store
            .set(&path, fields(json!({"a": 1, "b": 2})))
            .await
            .unwrap();
        store
            .update(&path, fields(json!({"b": 3})))
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.fields), json!({"a": 1, "b": 3}));
    }

    #[tokio::test]
    async fn test_increment() {
        let store = MemoryDocumentStore::new();
        let path = CollectionPath::new("products").doc("p1");
        store.set(&path, Fields::new()).await.unwrap();

        store.increment(&path, "likeCount", 1).await.unwrap();
        store.increment(&path, "likeCount", 1).await.unwrap();
        store.increment(&path, "likeCount", -1).await.unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("likeCount"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_increment_missing_document() {
        let store = MemoryDocumentStore::new();
        let path = CollectionPath::new("products").doc("ghost");
        let result = store.increment(&path, "likeCount", 1).await;
        assert!(matches!(result, Err(RemoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_query_eq() {
        let store = MemoryDocumentStore::new();
        let orders = CollectionPath::new("orders");
        store
            .add(&orders, fields(json!({"userId": "u1"})))
            .await
            .unwrap();
        store
            .add(&orders, fields(json!({"userId": "u2"})))
            .await
            .unwrap();

        let mine = store
            .query_eq(&orders, "userId", &json!("u1"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        let path = CollectionPath::new("users/u1/wishlist").doc("p1");
        store.set(&path, Fields::new()).await.unwrap();

        store.delete(&path).await.unwrap();
        store.delete(&path).await.unwrap();
        assert!(store.get(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MemoryDocumentStore::new();
        let products = CollectionPath::new("products");
        store.fail_on(Operation::List).await;

        let result = store.list(&products).await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));

        store.clear_failures().await;
        assert!(store.list(&products).await.unwrap().is_empty());
    }
}
