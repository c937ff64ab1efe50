//! Cart and checkout commands.

use tracing::info;

use vintage_core::ProductId;
use vintage_storefront::Storefront;
use vintage_storefront::remote::Fields;

/// Show the cart.
pub fn show(storefront: &Storefront) {
    let cart = storefront.cart();
    info!(lines = cart.count(), subtotal = %cart.subtotal(), "Cart");
    for item in cart.items() {
        info!(
            id = %item.product_id(),
            name = %item.product.name,
            quantity = item.quantity,
            total = %item.line_total(),
            "line"
        );
    }
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns an error if the product can't be read or the cart can't be saved.
pub async fn add(storefront: &mut Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = storefront
        .catalog_mut()
        .fetch_by_id(&ProductId::new(id))
        .await?;
    storefront.cart_mut().add_item(product)?;
    show(storefront);
    Ok(())
}

/// Take one unit off a line.
///
/// # Errors
///
/// Returns an error if the cart can't be saved.
pub fn decrement(storefront: &mut Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    storefront.cart_mut().decrement_item(&ProductId::new(id))?;
    show(storefront);
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the cart can't be saved.
pub fn remove(storefront: &mut Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    storefront.cart_mut().remove_item(&ProductId::new(id))?;
    show(storefront);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart slot can't be removed.
pub fn clear(storefront: &mut Storefront) -> Result<(), Box<dyn std::error::Error>> {
    storefront.cart_mut().clear()?;
    info!("Cart cleared");
    Ok(())
}

/// Submit the cart as an order.
///
/// # Errors
///
/// Returns an error if the cart is empty or the order can't be written.
pub async fn checkout(
    storefront: &mut Storefront,
    details: Fields,
) -> Result<(), Box<dyn std::error::Error>> {
    let subtotal = storefront.cart().subtotal();
    let order_id = storefront.checkout(details).await?;
    info!(order_id = %order_id, total = %subtotal, "Order placed");
    Ok(())
}
