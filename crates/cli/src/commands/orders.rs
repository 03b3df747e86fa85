//! Order commands: checkout, orders.

use std::str::FromStr;

use vitrine_client::{CheckoutForm, Storefront};
use vitrine_core::PaymentMethod;

pub async fn checkout(
    storefront: &Storefront,
    address: &str,
    payment: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let payment_method = PaymentMethod::from_str(payment)?;

    let form = CheckoutForm {
        shipping_address: address.to_string(),
        payment_method,
    };
    storefront.checkout(&form).await?;

    println!("Order placed");
    Ok(())
}

pub async fn list(storefront: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let orders = storefront.api().orders().await?;

    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }

    for order in orders {
        println!(
            "Order #{} - {} - {} - {}",
            order.id, order.created_at, order.status, order.total_amount
        );
        for item in &order.items {
            println!(
                "    product #{} x {} @ {}",
                item.product_id, item.quantity, item.price
            );
        }
    }
    Ok(())
}
