//! Wishlist commands.

use tracing::info;

use vintage_core::ProductId;
use vintage_storefront::Storefront;

/// Toggle a product on the current user's wishlist.
///
/// # Errors
///
/// Returns an error if nobody is signed in or a remote write fails.
pub async fn toggle(storefront: &mut Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = storefront
        .catalog_mut()
        .fetch_by_id(&ProductId::new(id))
        .await?;

    let wishlist = storefront.wishlist_mut();
    wishlist.fetch_count().await;
    let outcome = wishlist.toggle(&product).await?;
    info!(product_id = %id, ?outcome, count = wishlist.count(), "Wishlist updated");
    Ok(())
}

/// Show the size of the current user's wishlist.
pub async fn count(storefront: &mut Storefront) {
    let wishlist = storefront.wishlist_mut();
    wishlist.fetch_count().await;
    info!(count = wishlist.count(), "Wishlist");
}
