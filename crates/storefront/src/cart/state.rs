//! Pure cart state.

use vintage_core::{Price, ProductId};

use crate::models::{LineItem, Product};

/// Ordered cart lines, one per product id, in order of first add.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// State holding `items` as stored.
    #[must_use]
    pub const fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// The cart lines.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id() == id)
    }

    /// Add one unit of `product`, appending a new line if it isn't in the cart.
    pub fn add(&mut self, product: Product) {
        match self.line_mut(&product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(LineItem::new(product)),
        }
    }

    /// Take one unit off the line for `id`. A line never drops below one unit.
    pub fn decrement(&mut self, id: &ProductId) {
        if let Some(item) = self.line_mut(id)
            && item.quantity > 1
        {
            item.quantity -= 1;
        }
    }

    /// Drop the line for `id` whatever its quantity.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|item| item.product_id() != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines (badge value).
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of the line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.product_id() == id)
    }
}
