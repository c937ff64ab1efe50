//! Order submission.

use std::sync::Arc;

use tracing::instrument;

use vintage_core::{OrderId, Timestamp};

use crate::error::{Result, add_breadcrumb};
use crate::identity::IdentityProvider;
use crate::models::{Order, OrderOwner, OrderPayload, collections};
use crate::remote::{CollectionPath, DocumentStore, encode};

/// Writes orders for the signed-in user, or as a guest.
pub struct OrderSubmission {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for OrderSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSubmission").finish_non_exhaustive()
    }
}

impl OrderSubmission {
    /// Create the submitter over the document store and identity provider.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Create the order record with one write and return its id.
    ///
    /// The record carries the current user id (or `"GUEST"`), the creation
    /// time, and the total derived from the items.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Remote` if the write fails; no order exists then.
    #[instrument(skip(self, payload), fields(items = payload.items.len()))]
    pub async fn submit(&self, payload: OrderPayload) -> Result<OrderId> {
        let owner = OrderOwner::from(self.identity.current().map(|user| user.uid));
        let order = Order::new(payload, owner, Timestamp::now());

        let collection = CollectionPath::new(collections::ORDERS);
        let fields = encode(collection.as_str(), &order)?;
        let id = OrderId::new(self.store.add(&collection, fields).await?);

        add_breadcrumb("order", "Submitted order", Some(&[("order_id", id.as_str())]));
        tracing::info!(order_id = %id, total = %order.total, "Submitted order");
        Ok(id)
    }
}
