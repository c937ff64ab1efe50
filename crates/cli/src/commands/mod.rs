//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod seed;
pub mod wishlist;

use tracing::info;

use vintage_storefront::models::Product;

/// Log one product as a structured event.
fn log_product(product: &Product) {
    info!(
        id = %product.id,
        name = %product.name,
        price = %product.price,
        likes = product.like_count,
        reviews = product.review_count,
        rating = product.average_rating,
        "product"
    );
}
