//! Catalog browsing, available without a session.

use tempfile::TempDir;

use vitrine_client::Storefront;
use vitrine_core::{CategoryId, ProductId};
use vitrine_integration_tests::TestBackend;

async fn storefront(backend: &TestBackend, dir: &TempDir) -> Storefront {
    let config = backend.config(dir.path().join("session.json"));
    Storefront::new(config).await.expect("storefront starts")
}

#[tokio::test]
async fn catalog_is_browsable_anonymously() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = storefront(&backend, &dir).await;

    let categories = store.api().categories().await.expect("categories");
    assert_eq!(categories.len(), 2);

    let products = store.api().products(None).await.expect("products");
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn products_filter_by_category() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = storefront(&backend, &dir).await;

    let books = store
        .api()
        .products(Some(CategoryId::new(1)))
        .await
        .expect("filtered products");
    assert_eq!(books.len(), 1);
    assert_eq!(books.first().expect("one product").name, "Paperback Novel");
}

#[tokio::test]
async fn unknown_product_is_a_not_found_error() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = storefront(&backend, &dir).await;

    let err = store
        .api()
        .product(ProductId::new(404))
        .await
        .expect_err("unknown product is rejected");
    assert_eq!(err.user_message(), "Product not found");
}
