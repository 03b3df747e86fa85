//! Cart behavior against a live (fake) backend: server-side merge,
//! local reconciliation, pessimistic removal, and fold totals.

use rust_decimal::Decimal;
use tempfile::TempDir;

use vitrine_client::{Error, Storefront};
use vitrine_core::{CartItemId, ProductId};
use vitrine_integration_tests::TestBackend;

async fn logged_in_storefront(backend: &TestBackend, dir: &TempDir) -> Storefront {
    let config = backend.config(dir.path().join("session.json"));
    let store = Storefront::new(config).await.expect("storefront starts");
    store.login("alice", "secret").await.expect("login succeeds");
    store
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

#[tokio::test]
async fn add_merges_into_a_single_line_per_product() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    assert!(store.cart().items().is_empty());

    store
        .cart()
        .add_to_cart(ProductId::new(7), 2)
        .await
        .expect("first add");
    store
        .cart()
        .add_to_cart(ProductId::new(7), 3)
        .await
        .expect("second add merges");

    let items = store.cart().items();
    assert_eq!(items.len(), 1, "same product must stay a single line");
    let line = items.first().expect("one line");
    assert_eq!(line.quantity, 5);
    assert_eq!(line.line_total, dec("997.5"));

    assert_eq!(store.cart().item_count(), 5);
    assert_eq!(store.cart().total(), dec("997.5"));
}

#[tokio::test]
async fn distinct_products_get_distinct_lines() {
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

    assert_eq!(store.cart().items().len(), 2);
    assert_eq!(store.cart().item_count(), 3);
    assert_eq!(store.cart().total(), dec("438.25"));
}

#[tokio::test]
async fn remove_clears_the_line_and_totals() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    let line = store
        .cart()
        .add_to_cart(ProductId::new(7), 2)
        .await
        .expect("add");
    store
        .cart()
        .remove_from_cart(line.id)
        .await
        .expect("remove succeeds");

    assert!(store.cart().items().is_empty());
    assert_eq!(store.cart().item_count(), 0);
    assert_eq!(store.cart().total(), Decimal::ZERO);
}

#[tokio::test]
async fn failed_remove_keeps_the_line() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    store
        .cart()
        .add_to_cart(ProductId::new(7), 2)
        .await
        .expect("add");

    let err = store
        .cart()
        .remove_from_cart(CartItemId::new(9999))
        .await
        .expect_err("unknown line is rejected");
    match err {
        Error::Api(api) => assert_eq!(api.user_message(), "Cart item not found"),
        other => panic!("unexpected error: {other:?}"),
    }

    // Removal is pessimistic: the mirror changes only after the backend
    // confirms, so a failed removal leaves it intact.
    assert_eq!(store.cart().items().len(), 1);
    assert_eq!(store.cart().item_count(), 2);
}

#[tokio::test]
async fn insufficient_stock_leaves_the_mirror_unchanged() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    let err = store
        .cart()
        .add_to_cart(ProductId::new(9), 1)
        .await
        .expect_err("out-of-stock product is rejected");
    match err {
        Error::Api(api) => assert_eq!(api.user_message(), "Insufficient stock"),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(store.cart().items().is_empty());
}

#[tokio::test]
async fn stock_drop_between_adds_rejects_the_merge() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = logged_in_storefront(&backend, &dir).await;

    store
        .cart()
        .add_to_cart(ProductId::new(7), 2)
        .await
        .expect("first add fits the stock");

    // Stock shrinks below the would-be merged quantity before the
    // second add lands.
    backend.set_stock(7, 2);

    let err = store
        .cart()
        .add_to_cart(ProductId::new(7), 1)
        .await
        .expect_err("merged quantity exceeds the new stock");
    match err {
        Error::Api(api) => assert_eq!(api.user_message(), "Insufficient stock"),
        other => panic!("unexpected error: {other:?}"),
    }

    // The mirror keeps the previously confirmed line untouched.
    let items = store.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().expect("one line").quantity, 2);
}

#[tokio::test]
async fn anonymous_add_is_rejected_locally() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let config = backend.config(dir.path().join("session.json"));
    let store = Storefront::new(config).await.expect("storefront starts");

    let err = store
        .cart()
        .add_to_cart(ProductId::new(7), 1)
        .await
        .expect_err("anonymous add is rejected");
    assert!(matches!(err, Error::Validation(_)));
    assert!(store.cart().items().is_empty());
}
