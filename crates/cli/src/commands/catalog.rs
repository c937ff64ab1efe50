//! Catalog and review commands.

use tracing::info;

use vintage_core::ProductId;
use vintage_storefront::Storefront;
use vintage_storefront::models::ReviewInput;

use super::log_product;

/// Which catalog view to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Popular,
    Newest,
}

/// List products.
pub async fn list(storefront: &mut Storefront, view: View) {
    let catalog = storefront.catalog_mut();
    catalog.fetch_all().await;

    let products = match view {
        View::All => catalog.sorted_by_recency(),
        View::Popular => catalog.popular(),
        View::Newest => catalog.newest(),
    };
    info!(count = products.len(), ?view, "Products");
    for product in products {
        log_product(product);
    }
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the product doesn't exist or can't be read.
pub async fn show(storefront: &mut Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::new(id);
    let product = storefront.catalog_mut().fetch_by_id(&id).await?;
    log_product(&product);

    let wishlisted = storefront.wishlist().contains(&id).await;
    let purchased = storefront.catalog().has_purchased(&id).await;
    info!(wishlisted, purchased, "Status");
    Ok(())
}

/// Review a product as the current user.
///
/// # Errors
///
/// Returns an error if the rating is out of range, nobody is signed in, or
/// the review can't be written.
pub async fn review(
    storefront: &mut Storefront,
    id: &str,
    rating: i64,
    comment: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = ReviewInput::new(rating, comment.unwrap_or_default())?;
    let summary = storefront
        .catalog_mut()
        .add_review(&ProductId::new(id), input)
        .await?;
    info!(
        reviews = summary.review_count,
        rating = summary.average_rating,
        "Review added"
    );
    Ok(())
}

/// List a product's reviews.
pub async fn reviews(storefront: &mut Storefront, id: &str) {
    let id = ProductId::new(id);
    let catalog = storefront.catalog_mut();
    catalog.fetch_reviews(&id).await;

    let reviews = catalog.reviews(&id);
    info!(count = reviews.len(), "Reviews");
    for review in reviews {
        info!(
            user = %review.user_name,
            stars = review.rating.stars(),
            comment = %review.comment,
            "review"
        );
    }
}

/// Report whether the current user has bought a product.
pub async fn purchased(storefront: &Storefront, id: &str) {
    let purchased = storefront.catalog().has_purchased(&ProductId::new(id)).await;
    info!(product_id = %id, purchased, "Purchase check");
}
