//! Checkout: local validation, order placement, and cart clearing.

use rust_decimal::Decimal;
use tempfile::TempDir;

use vitrine_client::{CheckoutForm, Error, Storefront};
use vitrine_core::{OrderStatus, PaymentMethod, ProductId};
use vitrine_integration_tests::TestBackend;

async fn logged_in_storefront(backend: &TestBackend, dir: &TempDir) -> Storefront {
    let config = backend.config(dir.path().join("session.json"));
    let store = Storefront::new(config).await.expect("storefront starts");
    store.login("alice", "secret").await.expect("login succeeds");
    store
}

fn form(payment_method: PaymentMethod) -> CheckoutForm {
    CheckoutForm {
        shipping_address: "Rua das Flores 123, Sao Paulo".to_string(),
        payment_method,
    }
}

#[tokio::test]
async fn checkout_places_an_order_and_clears_the_cart() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    store
        .cart()
        .add_to_cart(ProductId::new(7), 2)
        .await
        .expect("add keyboard");
    store
        .cart()
        .add_to_cart(ProductId::new(8), 1)
        .await
        .expect("add novel");

    store
        .checkout(&form(PaymentMethod::Pix))
        .await
        .expect("checkout succeeds");

    assert!(store.cart().items().is_empty());
    assert_eq!(store.cart().total(), Decimal::ZERO);

    // The cart is empty server-side too, not just in the mirror.
    store.cart().reload().await.expect("reload");
    assert!(store.cart().items().is_empty());

    let orders = store.api().orders().await.expect("orders list");
    assert_eq!(orders.len(), 1);
    let order = orders.first().expect("one order");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_method, PaymentMethod::Pix);
    assert_eq!(order.total_amount, "438.25".parse::<Decimal>().expect("decimal"));
    assert_eq!(order.items.len(), 2);
}

#[tokio::test]
async fn empty_cart_checkout_is_rejected_locally() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    let err = store
        .checkout(&form(PaymentMethod::CreditCard))
        .await
        .expect_err("empty cart is rejected");
    assert!(matches!(err, Error::Validation(_)));

    let orders = store.api().orders().await.expect("orders list");
    assert!(orders.is_empty(), "no order may reach the backend");
}

#[tokio::test]
async fn blank_address_is_rejected_locally() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    store
        .cart()
        .add_to_cart(ProductId::new(7), 1)
        .await
        .expect("add");

    let bad_form = CheckoutForm {
        shipping_address: "   ".to_string(),
        payment_method: PaymentMethod::Boleto,
    };
    let err = store
        .checkout(&bad_form)
        .await
        .expect_err("blank address is rejected");
    assert!(matches!(err, Error::Validation(_)));

    // The cart is untouched by a failed checkout.
    assert_eq!(store.cart().items().len(), 1);
    let orders = store.api().orders().await.expect("orders list");
    assert!(orders.is_empty());
}
