//! Storefront state shared by a client session.

use std::sync::Arc;

use tracing::instrument;

use vintage_core::OrderId;

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::error::{Result, StoreError};
use crate::identity::IdentityProvider;
use crate::models::OrderPayload;
use crate::orders::OrderSubmission;
use crate::remote::{DocumentStore, Fields};
use crate::session::Session;
use crate::slot::LocalSlot;
use crate::wishlist::Wishlist;

/// External services the storefront talks to.
pub struct Collaborators {
    /// Remote document store
    pub store: Arc<dyn DocumentStore>,
    /// Identity provider
    pub identity: Arc<dyn IdentityProvider>,
    /// Durable slot holding the cart
    pub cart_slot: Box<dyn LocalSlot>,
}

/// All storefront components, wired to one set of collaborators.
///
/// Components are reached through accessors; actions take `&mut self`, so
/// actions on one component complete in the order they are issued.
#[derive(Debug)]
pub struct Storefront {
    cart: CartStore,
    wishlist: Wishlist,
    catalog: Catalog,
    orders: OrderSubmission,
    session: Session,
}

impl Storefront {
    /// Build every component and hydrate the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart slot can't be read or holds a
    /// corrupt cart.
    pub fn new(collaborators: Collaborators) -> Result<Self> {
        let Collaborators {
            store,
            identity,
            cart_slot,
        } = collaborators;

        Ok(Self {
            cart: CartStore::open(cart_slot)?,
            wishlist: Wishlist::new(Arc::clone(&store), Arc::clone(&identity)),
            catalog: Catalog::new(Arc::clone(&store), Arc::clone(&identity)),
            orders: OrderSubmission::new(Arc::clone(&store), Arc::clone(&identity)),
            session: Session::new(store, identity),
        })
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut Wishlist {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderSubmission {
        &self.orders
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Submit the cart as an order, then clear it.
    ///
    /// The cart is cleared only once the order exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyCart` before any remote call if the cart is
    /// empty, `StoreError::Remote` if the order can't be written (the cart is
    /// kept), and `StoreError::Storage` if the cart can't be cleared after a
    /// successful order.
    #[instrument(skip(self, details))]
    pub async fn checkout(&mut self, details: Fields) -> Result<OrderId> {
        if self.cart.state().is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let payload = OrderPayload {
            items: self.cart.items().to_vec(),
            details,
        };
        let order_id = self.orders.submit(payload).await?;

        self.cart.clear().inspect_err(|e| {
            tracing::error!(order_id = %order_id, error = %e, "Order placed but cart not cleared");
        })?;
        Ok(order_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentityProvider;
    use crate::models::{Product, collections};
    use crate::remote::{CollectionPath, MemoryDocumentStore, Operation};
    use crate::slot::MemorySlot;
    use vintage_core::Price;

    fn storefront(store: Arc<MemoryDocumentStore>) -> Storefront {
        Storefront::new(Collaborators {
            store,
            identity: Arc::new(MemoryIdentityProvider::new()),
            cart_slot: Box::new(MemorySlot::new()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.fail_on(Operation::Add).await;
        let mut storefront = storefront(store);

        let err = storefront.checkout(Fields::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyCart));
    }

    #[tokio::test]
    async fn test_checkout_clears_cart_on_success_only() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut storefront = storefront(store.clone());
        storefront
            .cart_mut()
            .add_item(Product::new("p1", "Scarf", Price::from_cents(1000)))
            .unwrap();

        store.fail_on(Operation::Add).await;
        assert!(storefront.checkout(Fields::new()).await.is_err());
        assert_eq!(storefront.cart().count(), 1);

        store.clear_failures().await;
        storefront.checkout(Fields::new()).await.unwrap();
        assert_eq!(storefront.cart().count(), 0);
        assert_eq!(
            store.count(&CollectionPath::new(collections::ORDERS)).await,
            1
        );
    }

    #[test]
    fn test_corrupt_cart_fails_construction() {
        let result = Storefront::new(Collaborators {
            store: Arc::new(MemoryDocumentStore::new()),
            identity: Arc::new(MemoryIdentityProvider::new()),
            cart_slot: Box::new(MemorySlot::with_value("oops")),
        });
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }
}
