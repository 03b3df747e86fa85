//! Cart commands: show, add, remove.

use vitrine_client::Storefront;
use vitrine_core::{CartItemId, ProductId};

pub fn show(storefront: &Storefront) {
    let cart = storefront.cart();
    let items = cart.items();

    if items.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in &items {
        println!(
            "{:>4}  {:<40} {} x {} = {}",
            item.id, item.product_name, item.quantity, item.unit_price, item.line_total
        );
    }
    println!("{} item(s), total {}", cart.item_count(), cart.total());
}

pub async fn add(
    storefront: &Storefront,
    product_id: i32,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = storefront
        .cart()
        .add_to_cart(ProductId::new(product_id), quantity)
        .await?;

    println!(
        "Added {} (line #{}, quantity now {})",
        item.product_name, item.id, item.quantity
    );
    show(storefront);
    Ok(())
}

pub async fn remove(
    storefront: &Storefront,
    item_id: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    storefront
        .cart()
        .remove_from_cart(CartItemId::new(item_id))
        .await?;

    println!("Removed line #{item_id}");
    show(storefront);
    Ok(())
}
