//! Product and cart line types.

use serde::{Deserialize, Deserializer, Serialize};

use vintage_core::timestamp::deserialize_lenient;
use vintage_core::{Price, ProductId, Timestamp};

use crate::remote::Fields;

/// A catalog product, tagged with its document id.
///
/// `like_count`, `review_count` and `average_rating` are aggregates owned by
/// the document store. Fields this type doesn't model are kept in `extra` so
/// snapshots taken into the cart carry the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub like_count: i64,
    #[serde(default, deserialize_with = "super::lenient_u32")]
    pub review_count: u32,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub average_rating: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Product {
    /// Create a product with zeroed aggregates.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            like_count: 0,
            review_count: 0,
            average_rating: 0.0,
            created_at: None,
            extra: Fields::new(),
        }
    }

    /// Creation time, with undated products sorting as the epoch.
    #[must_use]
    pub fn created_or_epoch(&self) -> Timestamp {
        self.created_at.unwrap_or_else(Timestamp::epoch)
    }

    /// The product's rating aggregate.
    #[must_use]
    pub const fn rating_summary(&self) -> RatingSummary {
        RatingSummary {
            review_count: self.review_count,
            average_rating: self.average_rating,
        }
    }
}

/// Review count and average rating of a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub review_count: u32,
    pub average_rating: f64,
}

impl RatingSummary {
    /// Fold one more rating into the running mean.
    ///
    /// `new_avg = (old_avg * old_count + rating) / (old_count + 1)`
    #[must_use]
    pub fn with_rating(self, rating: vintage_core::Rating) -> Self {
        let count = f64::from(self.review_count);
        Self {
            review_count: self.review_count.saturating_add(1),
            average_rating: self.average_rating.mul_add(count, rating.as_f64()) / (count + 1.0),
        }
    }
}

/// Key of the line quantity in a serialized [`LineItem`].
const LINE_QUANTITY_KEY: &str = "quantity";

/// One product in the cart.
///
/// Serialized flat, as the product fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default = "one", deserialize_with = "quantity_at_least_one")]
    pub quantity: u32,
}

impl LineItem {
    /// A new line holding one unit of `product`.
    ///
    /// A `quantity` carried in the product's extra fields (a stock count, say)
    /// is dropped so the line quantity is the only one serialized.
    #[must_use]
    pub fn new(mut product: Product) -> Self {
        product.extra.remove(LINE_QUANTITY_KEY);
        Self {
            product,
            quantity: 1,
        }
    }

    /// Id of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.line_total(self.quantity)
    }
}

const fn one() -> u32 {
    1
}

fn quantity_at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    super::lenient_u32(deserializer).map(|q| q.max(1))
}
