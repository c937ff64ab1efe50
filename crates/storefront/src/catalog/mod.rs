//! Catalog and review aggregator.
//!
//! Holds a snapshot of the `products` collection and the reviews fetched per
//! product. Reads fail soft and keep the previous snapshot. Adding a review
//! folds the rating into the product's stored `reviewCount` and
//! `averageRating` with a read-modify-write; concurrent reviewers race and
//! the last write wins.

mod state;

pub use state::{CatalogState, RAIL_SIZE};

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use vintage_core::{ProductId, Timestamp};

use crate::error::{Result, StoreError, add_breadcrumb, report_soft_failure};
use crate::identity::IdentityProvider;
use crate::models::{
    Product, RatingSummary, Review, ReviewInput, collections, references_product,
};
use crate::remote::{CollectionPath, DocPath, DocumentStore, Fields, encode};

/// Caches catalog reads and aggregates reviews into product ratings.
pub struct Catalog {
    state: CatalogState,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Create a catalog with an empty cache.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            state: CatalogState::default(),
            store,
            identity,
        }
    }

    /// Current catalog state.
    #[must_use]
    pub const fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Cached products, in store order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.state.products()
    }

    /// Up to four products with the highest like count.
    #[must_use]
    pub fn popular(&self) -> Vec<&Product> {
        self.state.popular()
    }

    /// All products, newest first.
    #[must_use]
    pub fn sorted_by_recency(&self) -> Vec<&Product> {
        self.state.sorted_by_recency()
    }

    /// The four newest products.
    #[must_use]
    pub fn newest(&self) -> Vec<&Product> {
        self.state.newest()
    }

    /// Replace the cached catalog with a fresh snapshot.
    ///
    /// On a failed read the previous snapshot is kept. Documents that don't
    /// decode as products are skipped.
    #[instrument(skip(self))]
    pub async fn fetch_all(&mut self) {
        let documents = match self.store.list(&products_collection()).await {
            Ok(documents) => documents,
            Err(e) => {
                report_soft_failure("catalog.fetch_all", &e);
                return;
            }
        };

        let products: Vec<Product> = documents
            .into_iter()
            .filter_map(|doc| {
                doc.decode_with_id::<Product>()
                    .inspect_err(|e| tracing::warn!(error = %e, "Skipping undecodable product"))
                    .ok()
            })
            .collect();

        tracing::debug!(count = products.len(), "Fetched catalog");
        self.state.replace_products(products);
    }

    /// Read one product and make it the current one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product doesn't exist and
    /// `StoreError::Remote` if the read or decode fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_by_id(&mut self, id: &ProductId) -> Result<Product> {
        let product = self.read_product(&product_path(id)).await?;
        self.state.set_current(product.clone());
        Ok(product)
    }

    /// Cached reviews of `id`.
    #[must_use]
    pub fn reviews(&self, id: &ProductId) -> &[Review] {
        self.state.reviews(id)
    }

    /// Replace the cached reviews of `id` with a fresh snapshot, in store
    /// order. On a failed read the previous list is kept.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_reviews(&mut self, id: &ProductId) {
        let documents = match self.store.list(&reviews_collection(id)).await {
            Ok(documents) => documents,
            Err(e) => {
                report_soft_failure("catalog.fetch_reviews", &e);
                return;
            }
        };

        let reviews: Vec<Review> = documents
            .into_iter()
            .filter_map(|doc| {
                doc.decode::<Review>()
                    .inspect_err(|e| tracing::warn!(error = %e, "Skipping undecodable review"))
                    .ok()
            })
            .collect();

        tracing::debug!(count = reviews.len(), "Fetched reviews");
        self.state.replace_reviews(id.clone(), reviews);
    }

    /// Append a review by the signed-in user and fold its rating into the
    /// product aggregate.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` when signed out,
    /// `StoreError::NotFound` if the product disappeared after the review was
    /// written, and `StoreError::Remote` on any other remote failure.
    #[instrument(skip(self, input), fields(product_id = %id, rating = input.rating.stars()))]
    pub async fn add_review(&mut self, id: &ProductId, input: ReviewInput) -> Result<RatingSummary> {
        let user = self.identity.current().ok_or(StoreError::Unauthenticated)?;

        let review = Review {
            product_id: id.clone(),
            user_id: user.uid.clone(),
            user_name: user.public_name().to_owned(),
            rating: input.rating,
            comment: input.comment,
            created_at: Some(Timestamp::now()),
        };
        let collection = reviews_collection(id);
        let fields = encode(collection.as_str(), &review)?;
        let review_id = self.store.add(&collection, fields).await?;

        let path = product_path(id);
        let summary = self
            .read_product(&path)
            .await?
            .rating_summary()
            .with_rating(input.rating);

        let mut update = Fields::new();
        update.insert(
            "reviewCount".to_owned(),
            Value::from(summary.review_count),
        );
        update.insert(
            "averageRating".to_owned(),
            Value::from(summary.average_rating),
        );
        self.store.update(&path, update).await?;

        self.state.record_review(review, summary);
        add_breadcrumb("review", "Added review", Some(&[("product_id", id.as_str())]));
        tracing::info!(
            uid = %user.uid,
            review_id = %review_id,
            review_count = summary.review_count,
            average_rating = summary.average_rating,
            "Added review"
        );
        Ok(summary)
    }

    /// Whether the signed-in user has an order containing `id`.
    ///
    /// False when signed out or when the orders can't be read.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn has_purchased(&self, id: &ProductId) -> bool {
        let Some(user) = self.identity.current() else {
            return false;
        };

        let orders = self
            .store
            .query_eq(
                &CollectionPath::new(collections::ORDERS),
                "userId",
                &Value::from(user.uid.as_str()),
            )
            .await;

        match orders {
            Ok(orders) => orders
                .iter()
                .any(|order| references_product(&order.fields, id)),
            Err(e) => {
                report_soft_failure("catalog.has_purchased", &e);
                false
            }
        }
    }

    async fn read_product(&self, path: &DocPath) -> Result<Product> {
        let document = self
            .store
            .get(path)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("product {}", path.id())))?;
        Ok(document.decode_with_id()?)
    }
}

fn products_collection() -> CollectionPath {
    CollectionPath::new(collections::PRODUCTS)
}

fn product_path(id: &ProductId) -> DocPath {
    products_collection().doc(id.as_str())
}

fn reviews_collection(id: &ProductId) -> CollectionPath {
    product_path(id).sub_collection(collections::REVIEWS)
}
