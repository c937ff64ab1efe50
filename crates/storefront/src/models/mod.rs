//! Domain models for the storefront state layer.
//!
//! These are the typed forms of documents read from and written to the
//! document store. Decoding is lenient about aggregates written by other
//! clients (missing or `null` counters read as zero) and normalizes dates
//! into [`vintage_core::Timestamp`].

pub mod order;
pub mod product;
pub mod review;
pub mod user;
pub mod wishlist;

pub use order::{GUEST_USER_ID, Order, OrderOwner, OrderPayload, references_product};
pub use product::{LineItem, Product, RatingSummary};
pub use review::{Review, ReviewInput};
pub use user::{RegisterDetails, UserProfile};
pub use wishlist::WishlistEntry;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Collection names in the document store.
pub mod collections {
    /// Product catalog.
    pub const PRODUCTS: &str = "products";
    /// Submitted orders.
    pub const ORDERS: &str = "orders";
    /// User profiles.
    pub const USERS: &str = "users";
    /// Per-user wishlist sub-collection under `users/{uid}`.
    pub const WISHLIST: &str = "wishlist";
    /// Per-product review sub-collection under `products/{id}`.
    pub const REVIEWS: &str = "reviews";
}

/// Read a counter that may be missing, `null`, or stored as a float.
pub(crate) fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    #[allow(clippy::cast_possible_truncation)] // Counters are whole numbers
    let count = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or(0);
    Ok(count)
}

/// Like [`lenient_count`], clamped into `u32`.
pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let count = lenient_count(deserializer)?;
    Ok(u32::try_from(count.max(0)).unwrap_or(u32::MAX))
}

/// Read a float that may be missing or `null`.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(0.0))
}
