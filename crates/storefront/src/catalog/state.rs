//! Pure catalog state and derived views.

use std::collections::HashMap;

use vintage_core::ProductId;

use crate::models::{Product, RatingSummary, Review};

/// Number of products shown in the popular and newest rails.
pub const RAIL_SIZE: usize = 4;

/// Cached catalog snapshot, the product on display, and fetched reviews.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    products: Vec<Product>,
    current: Option<Product>,
    reviews: HashMap<ProductId, Vec<Review>>,
}

impl CatalogState {
    /// Cached products, in store order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The product last fetched by id.
    #[must_use]
    pub const fn current(&self) -> Option<&Product> {
        self.current.as_ref()
    }

    /// Cached reviews of `id`, empty if never fetched.
    #[must_use]
    pub fn reviews(&self, id: &ProductId) -> &[Review] {
        self.reviews.get(id).map_or(&[], Vec::as_slice)
    }

    /// Up to four products with the highest like count. Ties keep store order.
    #[must_use]
    pub fn popular(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        products.sort_by(|a, b| b.like_count.cmp(&a.like_count));
        products.truncate(RAIL_SIZE);
        products
    }

    /// All products, newest first. Undated products sort as the epoch.
    #[must_use]
    pub fn sorted_by_recency(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        products.sort_by_key(|p| std::cmp::Reverse(p.created_or_epoch()));
        products
    }

    /// The four newest products.
    #[must_use]
    pub fn newest(&self) -> Vec<&Product> {
        let mut products = self.sorted_by_recency();
        products.truncate(RAIL_SIZE);
        products
    }

    /// Replace the cached catalog.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Remember `product` as the one on display.
    pub fn set_current(&mut self, product: Product) {
        self.current = Some(product);
    }

    /// Replace the cached reviews of `id`.
    pub fn replace_reviews(&mut self, id: ProductId, reviews: Vec<Review>) {
        self.reviews.insert(id, reviews);
    }

    /// Record a newly written review and its effect on the product aggregate.
    pub fn record_review(&mut self, review: Review, summary: RatingSummary) {
        let apply = |product: &mut Product| {
            product.review_count = summary.review_count;
            product.average_rating = summary.average_rating;
        };
        self.products
            .iter_mut()
            .filter(|p| p.id == review.product_id)
            .for_each(apply);
        if let Some(current) = self.current.as_mut().filter(|p| p.id == review.product_id) {
            apply(current);
        }
        if let Some(reviews) = self.reviews.get_mut(&review.product_id) {
            reviews.push(review);
        }
    }
}
