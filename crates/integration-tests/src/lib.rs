//! Integration tests for the Vintage storefront state layer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vintage-integration-tests
//! ```
//!
//! Every test builds a [`TestContext`]: an in-memory document store seeded
//! with a small catalog, an in-memory identity provider, and a cart slot file
//! in a temporary directory so restarts can be simulated.
//!
//! # Test Categories
//!
//! - `cart` - durable cart behavior
//! - `wishlist` - membership toggling and like counters
//! - `catalog` - catalog views, reviews and rating aggregates
//! - `orders` - checkout, order records and purchase checks
//! - `session` - registration, login and logout

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;

use vintage_core::{ProductId, UserId};
use vintage_storefront::cart::CartStore;
use vintage_storefront::identity::{Identity, MemoryIdentityProvider};
use vintage_storefront::models::{Product, collections};
use vintage_storefront::remote::{CollectionPath, DocPath, DocumentStore, Fields, MemoryDocumentStore};
use vintage_storefront::slot::FileSlot;
use vintage_storefront::{Collaborators, Storefront};

/// Seeded catalog: `(id, name, price, likeCount, createdAt)`.
pub const CATALOG: [(&str, &str, &str, i64, Option<&str>); 6] = [
    ("corduroy-jacket", "Corduroy Jacket", "350000", 2, Some("2024-03-01T09:00:00Z")),
    ("silk-scarf", "Silk Scarf", "125000", 9, Some("2024-05-01T09:00:00Z")),
    ("denim-vest", "Denim Vest", "210000", 0, None),
    ("wool-coat", "Wool Coat", "640000", 5, Some("2024-01-15T09:00:00Z")),
    ("linen-shirt", "Linen Shirt", "180000", 1, Some("2024-04-10T09:00:00Z")),
    ("leather-belt", "Leather Belt", "95000", 3, Some("2023-12-24T09:00:00Z")),
];

/// Memory collaborators wired into a [`Storefront`].
pub struct TestContext {
    pub store: Arc<MemoryDocumentStore>,
    pub identity: Arc<MemoryIdentityProvider>,
    pub storefront: Storefront,
    cart_dir: TempDir,
}

impl TestContext {
    /// Context with nobody signed in.
    pub async fn new() -> Self {
        Self::with_identity(MemoryIdentityProvider::new()).await
    }

    /// Context with `uid` signed in.
    pub async fn signed_in(uid: &str, display_name: Option<&str>) -> Self {
        Self::with_identity(MemoryIdentityProvider::signed_in(Identity {
            uid: UserId::new(uid),
            email: format!("{uid}@example.com"),
            display_name: display_name.map(str::to_owned),
        }))
        .await
    }

    async fn with_identity(identity: MemoryIdentityProvider) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        for (id, name, price, likes, created_at) in CATALOG {
            let mut fields = json!({"name": name, "price": price, "likeCount": likes});
            if let (Some(date), Some(map)) = (created_at, fields.as_object_mut()) {
                map.insert("createdAt".to_owned(), json!(date));
            }
            store
                .set(&product_path(id), into_fields(fields))
                .await
                .expect("Failed to seed product");
        }

        let identity = Arc::new(identity);
        let cart_dir = tempfile::tempdir().expect("Failed to create cart directory");
        let storefront = Storefront::new(Collaborators {
            store: store.clone(),
            identity: identity.clone(),
            cart_slot: Box::new(FileSlot::new(cart_dir.path().join("cart.json"))),
        })
        .expect("Failed to build storefront");

        Self {
            store,
            identity,
            storefront,
            cart_dir,
        }
    }

    /// Location of the durable cart.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.cart_dir.path().join("cart.json")
    }

    /// Open a second cart store over the same slot, as after a restart.
    pub fn reopen_cart(&self) -> CartStore {
        CartStore::open(Box::new(FileSlot::new(self.cart_path()))).expect("Failed to reopen cart")
    }

    /// Read a seeded product straight from the store.
    pub async fn product(&self, id: &str) -> Product {
        self.store
            .get(&product_path(id))
            .await
            .expect("Failed to read product")
            .expect("Product missing")
            .decode_with_id()
            .expect("Failed to decode product")
    }

    /// Stored `likeCount` of a product.
    pub async fn like_count(&self, id: &str) -> i64 {
        self.product(id).await.like_count
    }

    /// Number of wishlist documents of `uid`.
    pub async fn wishlist_size(&self, uid: &str) -> usize {
        let collection = CollectionPath::new(collections::USERS)
            .doc(uid)
            .sub_collection(collections::WISHLIST);
        self.store.count(&collection).await
    }

    /// Number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.store
            .count(&CollectionPath::new(collections::ORDERS))
            .await
    }

    /// Write an order document directly, as another client would.
    pub async fn insert_order(&self, order: Value) -> String {
        self.store
            .add(&CollectionPath::new(collections::ORDERS), into_fields(order))
            .await
            .expect("Failed to insert order")
    }
}

/// Path of a product document.
#[must_use]
pub fn product_path(id: &str) -> DocPath {
    CollectionPath::new(collections::PRODUCTS).doc(id)
}

/// Shorthand for a product id.
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::new(id)
}

/// Unwrap a JSON object literal into document fields.
#[must_use]
pub fn into_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}
