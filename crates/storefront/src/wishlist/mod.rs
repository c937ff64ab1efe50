//! Wishlist coordinator.
//!
//! Membership is a document at `users/{uid}/wishlist/{productId}`. Toggling
//! also moves the product's `likeCount` by one. The two writes are separate
//! documents with no transaction between them, so `likeCount` is an
//! eventually consistent counter; [`Wishlist::fetch_count`] resyncs the local
//! count from the membership collection.

mod state;

pub use state::WishlistState;

use std::sync::Arc;

use tracing::instrument;

use vintage_core::{ProductId, ToggleOutcome, UserId};

use crate::error::{Result, StoreError, add_breadcrumb, report_soft_failure};
use crate::identity::IdentityProvider;
use crate::models::{Product, WishlistEntry, collections};
use crate::remote::{CollectionPath, DocPath, DocumentStore, encode};

/// Field on product documents tracking how many wishlists hold the product.
const LIKE_COUNT_FIELD: &str = "likeCount";

/// Coordinates wishlist membership with the product like counter.
pub struct Wishlist {
    state: WishlistState,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for Wishlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wishlist")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Wishlist {
    /// Create a coordinator with a zero count.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            state: WishlistState::default(),
            store,
            identity,
        }
    }

    /// Current wishlist state.
    #[must_use]
    pub const fn state(&self) -> &WishlistState {
        &self.state
    }

    /// Locally cached wishlist size.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.state.count()
    }

    /// Resync the count from the membership collection.
    ///
    /// Signed out, the count is zero. A failed read keeps the previous count.
    #[instrument(skip(self))]
    pub async fn fetch_count(&mut self) {
        let Some(user) = self.identity.current() else {
            self.state.resync(0);
            return;
        };

        match self.store.list(&wishlist_collection(&user.uid)).await {
            Ok(entries) => {
                tracing::debug!(uid = %user.uid, count = entries.len(), "Resynced wishlist count");
                self.state.resync(entries.len());
            }
            Err(e) => report_soft_failure("wishlist.fetch_count", &e),
        }
    }

    /// Add `product` to the wishlist, or remove it if it's already there.
    ///
    /// The local count is adjusted only after both remote writes succeed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` when signed out (nothing is
    /// touched) and `StoreError::Remote` if a remote call fails. A failure on
    /// the counter write leaves the membership change in place.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn toggle(&mut self, product: &Product) -> Result<ToggleOutcome> {
        let user = self.identity.current().ok_or(StoreError::Unauthenticated)?;
        let entry_path = wishlist_collection(&user.uid).doc(product.id.as_str());

        let outcome = if self.store.get(&entry_path).await?.is_some() {
            self.store.delete(&entry_path).await?;
            ToggleOutcome::Removed
        } else {
            let entry = WishlistEntry::for_product(product);
            let fields = encode(&entry_path.to_string(), &entry)?;
            self.store.set(&entry_path, fields).await?;
            ToggleOutcome::Added
        };

        self.store
            .increment(
                &product_path(&product.id),
                LIKE_COUNT_FIELD,
                outcome.like_delta(),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(
                    uid = %user.uid,
                    error = %e,
                    "Wishlist membership changed but like counter was not updated"
                );
            })?;

        self.state.record(outcome);
        add_breadcrumb(
            "wishlist",
            match outcome {
                ToggleOutcome::Added => "Added to wishlist",
                ToggleOutcome::Removed => "Removed from wishlist",
            },
            Some(&[("product_id", product.id.as_str())]),
        );
        tracing::info!(uid = %user.uid, ?outcome, count = self.state.count(), "Toggled wishlist");
        Ok(outcome)
    }

    /// Whether `product_id` is on the signed-in user's wishlist.
    ///
    /// False when signed out or when the store can't be read.
    #[instrument(skip(self))]
    pub async fn contains(&self, product_id: &ProductId) -> bool {
        let Some(user) = self.identity.current() else {
            return false;
        };
        let path = wishlist_collection(&user.uid).doc(product_id.as_str());
        match self.store.get(&path).await {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                report_soft_failure("wishlist.contains", &e);
                false
            }
        }
    }
}

fn wishlist_collection(uid: &UserId) -> CollectionPath {
    CollectionPath::new(collections::USERS)
        .doc(uid.as_str())
        .sub_collection(collections::WISHLIST)
}

fn product_path(id: &ProductId) -> DocPath {
    CollectionPath::new(collections::PRODUCTS).doc(id.as_str())
}
