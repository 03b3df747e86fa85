//! Account registration: no implicit login, duplicate rejection, and
//! local email validation.

use tempfile::TempDir;

use vitrine_client::{Error, Storefront};
use vitrine_integration_tests::TestBackend;

async fn storefront(backend: &TestBackend, dir: &TempDir) -> Storefront {
    let config = backend.config(dir.path().join("session.json"));
    Storefront::new(config).await.expect("storefront starts")
}

#[tokio::test]
async fn register_creates_the_account_without_logging_in() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = storefront(&backend, &dir).await;

    let user = store
        .register("bob", "bob@example.com", "hunter2", "Bob Costa")
        .await
        .expect("registration succeeds");
    assert_eq!(user.username, "bob");
    assert_eq!(user.email, "bob@example.com");
    assert!(user.is_active);

    // Registration does not establish a session.
    assert!(!store.session().is_authenticated());

    // The new account can log in.
    store.login("bob", "hunter2").await.expect("login as bob");
    assert!(store.session().is_authenticated());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = storefront(&backend, &dir).await;

    let err = store
        .register("alice", "other@example.com", "pw", "")
        .await
        .expect_err("duplicate username is rejected");
    match err {
        Error::Api(api) => {
            assert_eq!(api.user_message(), "Username or email already registered");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_email_is_rejected_locally() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let store = storefront(&backend, &dir).await;

    let err = store
        .register("carol", "not-an-email", "pw", "")
        .await
        .expect_err("bad email is rejected");
    assert!(matches!(err, Error::Validation(_)));
}
