//! Persistent cart store.
//!
//! The cart lives in memory as a [`CartState`] and is mirrored to a
//! [`LocalSlot`] as a JSON array of flat line items. Every mutation writes the
//! whole cart before it is committed in memory, so the durable copy and the
//! in-memory cart never diverge. On start the durable copy is authoritative.

mod state;

pub use state::CartState;

use tracing::instrument;

use vintage_core::{Price, ProductId};

use crate::error::add_breadcrumb;
use crate::models::{LineItem, Product};
use crate::slot::{LocalSlot, SlotError};

/// Cart state mirrored to a durable slot.
pub struct CartStore {
    state: CartState,
    slot: Box<dyn LocalSlot>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Hydrate the cart from `slot`. An empty slot is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::Io` if the slot can't be read and
    /// `SlotError::Corrupt` if its contents aren't a serialized cart.
    pub fn open(slot: Box<dyn LocalSlot>) -> Result<Self, SlotError> {
        let state = match slot.get()? {
            Some(blob) => CartState::from_items(decode(&blob)?),
            None => CartState::default(),
        };
        tracing::debug!(lines = state.count(), "Hydrated cart");
        Ok(Self { state, slot })
    }

    /// Current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The cart lines.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.count()
    }

    /// Sum of the line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.subtotal()
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `SlotError` if the cart can't be persisted; the in-memory cart
    /// is left unchanged.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product) -> Result<(), SlotError> {
        add_breadcrumb("cart", "Added item", Some(&[("product_id", product.id.as_str())]));
        self.apply(|cart| cart.add(product))
    }

    /// Take one unit off the line for `id`. Lines stay at one unit minimum.
    ///
    /// # Errors
    ///
    /// Returns `SlotError` if the cart can't be persisted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn decrement_item(&mut self, id: &ProductId) -> Result<(), SlotError> {
        self.apply(|cart| cart.decrement(id))
    }

    /// Remove the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns `SlotError` if the cart can't be persisted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<(), SlotError> {
        add_breadcrumb("cart", "Removed item", Some(&[("product_id", id.as_str())]));
        self.apply(|cart| cart.remove(id))
    }

    /// Empty the cart and delete the durable slot.
    ///
    /// # Errors
    ///
    /// Returns `SlotError` if the slot can't be removed.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), SlotError> {
        self.slot.remove()?;
        self.state.clear();
        tracing::info!("Cleared cart");
        Ok(())
    }

    /// Run `transition` on a copy of the cart, persist it, then commit it.
    fn apply(&mut self, transition: impl FnOnce(&mut CartState)) -> Result<(), SlotError> {
        let mut next = self.state.clone();
        transition(&mut next);
        self.slot.set(&encode(next.items())?)?;
        self.state = next;
        Ok(())
    }
}

fn decode(blob: &str) -> Result<Vec<LineItem>, SlotError> {
    serde_json::from_str(blob).map_err(|e| SlotError::Corrupt(e.to_string()))
}

fn encode(items: &[LineItem]) -> Result<String, SlotError> {
    serde_json::to_string(items).map_err(|e| SlotError::Corrupt(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::remote::{Document, Fields};
    use crate::slot::{FileSlot, MemorySlot};

    /// Slot handle that lets the test inspect what the store wrote.
    struct SharedSlot(Arc<MemorySlot>);

    impl LocalSlot for SharedSlot {
        fn get(&self) -> Result<Option<String>, SlotError> {
            self.0.get()
        }
        fn set(&self, value: &str) -> Result<(), SlotError> {
            self.0.set(value)
        }
        fn remove(&self) -> Result<(), SlotError> {
            self.0.remove()
        }
    }

    /// Slot whose writes always fail.
    struct ReadOnlySlot;

    impl LocalSlot for ReadOnlySlot {
        fn get(&self) -> Result<Option<String>, SlotError> {
            Ok(None)
        }
        fn set(&self, _value: &str) -> Result<(), SlotError> {
            Err(SlotError::Io(std::io::Error::other("read-only")))
        }
        fn remove(&self) -> Result<(), SlotError> {
            Ok(())
        }
    }

    fn product(id: &str) -> Product {
        Product::new(id, format!("Product {id}"), Price::from_cents(1999))
    }

    fn persisted(slot: &MemorySlot) -> Vec<LineItem> {
        decode(&slot.get().unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_every_mutation_persists_whole_cart() {
        let slot = Arc::new(MemorySlot::new());
        let mut cart = CartStore::open(Box::new(SharedSlot(Arc::clone(&slot)))).unwrap();

        cart.add_item(product("p1")).unwrap();
        assert_eq!(persisted(&slot), cart.items());

        cart.add_item(product("p2")).unwrap();
        cart.add_item(product("p1")).unwrap();
        assert_eq!(persisted(&slot), cart.items());

        cart.decrement_item(&ProductId::new("p1")).unwrap();
        assert_eq!(persisted(&slot), cart.items());

        cart.remove_item(&ProductId::new("p2")).unwrap();
        assert_eq!(persisted(&slot), cart.items());
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_stored_product_snapshot_survives_restart() {
        let fields: Fields = match json!({
            "name": "Corduroy Jacket",
            "price": 350000,
            "likeCount": 2,
            "averageRating": 4.5,
            "createdAt": {"seconds": 1714557600, "nanoseconds": 0},
            "quantity": 7,
            "size": "M",
            "measurements": {"chest": 54, "length": 70}
        }) {
            serde_json::Value::Object(map) => map,
            _ => Fields::new(),
        };
        let jacket: Product = Document {
            id: "p1".to_owned(),
            fields,
        }
        .decode_with_id()
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        let mut cart = CartStore::open(Box::new(FileSlot::new(&path))).unwrap();
        cart.add_item(jacket.clone()).unwrap();
        cart.add_item(jacket).unwrap();
        cart.add_item(product("p2")).unwrap();

        let reopened = CartStore::open(Box::new(FileSlot::new(&path))).unwrap();
        assert_eq!(reopened.items(), cart.items());
        assert_eq!(reopened.items()[0].quantity, 2);
        assert_eq!(
            reopened.items()[0].product.extra.get("measurements"),
            Some(&json!({"chest": 54, "length": 70}))
        );
    }

    #[test]
    fn test_open_hydrates_from_slot() {
        let slot = MemorySlot::with_value(
            r#"[{"id": "p1", "name": "Scarf", "price": "12.50"}, {"id": "p2", "quantity": 3}]"#,
        );
        let cart = CartStore::open(Box::new(slot)).unwrap();

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[1].quantity, 3);
    }

    #[test]
    fn test_open_rejects_corrupt_blob() {
        let result = CartStore::open(Box::new(MemorySlot::with_value("{not json")));
        assert!(matches!(result, Err(SlotError::Corrupt(_))));
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let mut cart = CartStore::open(Box::new(ReadOnlySlot)).unwrap();
        assert!(cart.add_item(product("p1")).is_err());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_clear_removes_slot_and_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let mut cart = CartStore::open(Box::new(FileSlot::new(&path))).unwrap();
        cart.add_item(product("p1")).unwrap();
        assert!(path.exists());

        let reopened = CartStore::open(Box::new(FileSlot::new(&path))).unwrap();
        assert_eq!(reopened.items(), cart.items());

        cart.clear().unwrap();
        assert_eq!(cart.count(), 0);
        assert!(!path.exists());

        let reopened = CartStore::open(Box::new(FileSlot::new(&path))).unwrap();
        assert_eq!(reopened.count(), 0);
    }
}
