//! Wishlist membership record.

use serde::{Deserialize, Serialize};

use vintage_core::{Price, ProductId, Timestamp};

use super::Product;

/// Membership of one product in a user's wishlist, stored at
/// `users/{uid}/wishlist/{productId}`. Existence is the membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub added_at: Timestamp,
    pub product_name: String,
    pub price: Price,
}

impl WishlistEntry {
    /// Entry for `product`, added now.
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            added_at: Timestamp::now(),
            product_name: product.name.clone(),
            price: product.price,
        }
    }
}
