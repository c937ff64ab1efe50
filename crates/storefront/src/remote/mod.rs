//! Remote document store client.
//!
//! # Architecture
//!
//! - The document store is the source of truth for products, wishlist
//!   entries, reviews, orders and user profiles - NO local sync.
//! - Documents are JSON objects addressed by collection path and string id.
//!   Sub-collections nest under a document (`users/{uid}/wishlist`).
//! - Only single-document writes are atomic. Updates spanning two documents
//!   (wishlist entry + like counter) are separate calls.
//!
//! # Implementations
//!
//! - [`MemoryDocumentStore`] - in-process store with failure injection
//! - [`JsonFileStore`] - memory store persisted to a JSON snapshot file
//!
//! # Example
//!
//! ```rust,ignore
//! use vintage_storefront::remote::{CollectionPath, DocumentStore};
//!
//! let products = CollectionPath::new("products");
//! let docs = store.list(&products).await?;
//! ```

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::{MemoryDocumentStore, Operation, Snapshot};

use core::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Document data: a JSON object of named fields.
pub type Fields = serde_json::Map<String, Value>;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store could not be reached or rejected the call.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The addressed document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// A document could not be converted to or from its typed form.
    #[error("document decode error at {path}: {source}")]
    Decode {
        /// Path of the offending document.
        path: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Local persistence of the store failed.
    #[error("document store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Path of a collection, e.g. `products` or `users/u1/wishlist`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Create a top-level collection path.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Address a document inside this collection.
    #[must_use]
    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// The path as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    collection: CollectionPath,
    id: String,
}

impl DocPath {
    /// Collection containing this document.
    #[must_use]
    pub const fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Document id within its collection.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Address a sub-collection nested under this document.
    #[must_use]
    pub fn sub_collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}/{name}", self.collection, self.id))
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned document id.
    pub id: String,
    /// Document fields.
    pub fields: Fields,
}

impl Document {
    /// Decode the fields into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Decode` if the fields don't match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, RemoteError> {
        let id = self.id;
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|source| RemoteError::Decode { path: id, source })
    }

    /// Decode into a typed record, tagging it with the document id under `"id"`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Decode` if the fields don't match `T`.
    pub fn decode_with_id<T: DeserializeOwned>(mut self) -> Result<T, RemoteError> {
        self.fields
            .insert("id".to_owned(), Value::String(self.id.clone()));
        self.decode()
    }
}

/// Encode a typed record into document fields.
///
/// # Errors
///
/// Returns `RemoteError::Decode` if `value` doesn't serialize to a JSON object.
pub fn encode<T: Serialize>(path: &str, value: &T) -> Result<Fields, RemoteError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(RemoteError::Decode {
            path: path.to_owned(),
            source: serde::de::Error::custom(format!("expected an object, got {other}")),
        }),
        Err(source) => Err(RemoteError::Decode {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Client for a remote document store.
///
/// Every call is an independent unit of work; there are no multi-document
/// transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document. Returns `None` if it doesn't exist.
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, RemoteError>;

    /// Read every document of a collection, in unspecified order.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, RemoteError>;

    /// Read the documents whose `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, RemoteError>;

    /// Create a document with a store-assigned id and return that id.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String, RemoteError>;

    /// Create or overwrite a document.
    async fn set(&self, path: &DocPath, fields: Fields) -> Result<(), RemoteError>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with `RemoteError::NotFound` if the document doesn't exist.
    async fn update(&self, path: &DocPath, fields: Fields) -> Result<(), RemoteError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocPath) -> Result<(), RemoteError>;

    /// Atomically add `delta` to a numeric field (missing fields count as 0).
    ///
    /// Fails with `RemoteError::NotFound` if the document doesn't exist.
    async fn increment(&self, path: &DocPath, field: &str, delta: i64) -> Result<(), RemoteError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_paths() {
        let users = CollectionPath::new("users");
        let user = users.doc("u1");
        assert_eq!(user.to_string(), "users/u1");

        let wishlist = user.sub_collection("wishlist");
        assert_eq!(wishlist.as_str(), "users/u1/wishlist");
        assert_eq!(wishlist.doc("p1").to_string(), "users/u1/wishlist/p1");
    }

    #[test]
    fn test_decode_with_id() {
        #[derive(Deserialize)]
        struct Named {
            id: String,
            name: String,
        }

        let mut fields = Fields::new();
        fields.insert("name".to_owned(), Value::from("Denim Jacket"));
        let doc = Document {
            id: "p1".to_owned(),
            fields,
        };

        let named: Named = doc.decode_with_id().unwrap();
        assert_eq!(named.id, "p1");
        assert_eq!(named.name, "Denim Jacket");
    }

    #[test]
    fn test_decode_error_names_document() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Strict {
            count: u32,
        }

        let doc = Document {
            id: "broken".to_owned(),
            fields: Fields::new(),
        };
        let err = doc.decode::<Strict>().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_encode_rejects_non_objects() {
        assert!(encode("x", &42).is_err());
        assert!(encode("x", &serde_json::json!({"a": 1})).is_ok());
    }
}
