//! Storefront facade wiring session, API access, and cart together.
//!
//! Control flow: session store changes drive the cart manager - a login
//! reloads the mirror from the backend, a logout clears it locally. The
//! facade owns that wiring so callers cannot observe a session and a cart
//! that disagree.

use std::sync::Arc;

use tracing::{instrument, warn};

use vitrine_core::{AccessToken, Email};

use crate::api::ApiClient;
use crate::api::types::{RegisterRequest, UserIdentity};
use crate::cart::CartManager;
use crate::checkout::CheckoutForm;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::storage::{FileStorage, SessionStorage};

/// The storefront client.
///
/// Cheaply cloneable via `Arc`; all clones share the same session, cart
/// mirror, and HTTP client.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    session: SessionStore,
    api: ApiClient,
    cart: CartManager,
}

impl Storefront {
    /// Create a storefront with file-backed session storage at the
    /// configured path.
    ///
    /// The persisted session is restored before the cart manager makes
    /// its first load decision, so there is no window where the cart
    /// loads anonymously and then immediately reloads authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let storage = FileStorage::new(config.session_file.clone());
        Self::with_storage(config, Box::new(storage)).await
    }

    /// Create a storefront over custom session storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    pub async fn with_storage(
        config: ClientConfig,
        storage: Box<dyn SessionStorage>,
    ) -> Result<Self> {
        let session = SessionStore::new(storage);
        session.restore()?;

        let api = ApiClient::new(&config, session.clone());
        let cart = CartManager::new(api.clone(), session.clone());

        let storefront = Self {
            inner: Arc::new(StorefrontInner {
                config,
                session,
                api,
                cart,
            }),
        };

        // First cart load decision, after restore: fetch when a session
        // was restored, otherwise the mirror just stays empty. Best
        // effort, like any background load.
        if let Err(e) = storefront.inner.cart.reload().await {
            warn!("initial cart load failed: {}", e.user_message());
        }

        Ok(storefront)
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the cart manager.
    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Log in and load the remote cart.
    ///
    /// On success the credential and identity are persisted durably and
    /// the cart mirror is fetched (best effort - a failed fetch logs and
    /// leaves the mirror empty, it does not undo the login). On failure
    /// the backend's message is surfaced and nothing changes.
    ///
    /// The login endpoint returns only a credential, so the stored
    /// identity is synthesized from the submitted username with empty
    /// profile fields until a dedicated profile fetch exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected, the request
    /// fails, or the session cannot be persisted.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let token = self.inner.api.login(username, password).await?;

        let user = UserIdentity::placeholder(username);
        self.inner
            .session
            .establish(AccessToken::new(token.access_token), user.clone())?;

        if let Err(e) = self.inner.cart.reload().await {
            warn!("cart load after login failed: {}", e.user_message());
        }

        Ok(user)
    }

    /// Register a new account.
    ///
    /// Does not establish a session; the new user logs in separately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed email, or the remote
    /// rejection otherwise.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<UserIdentity> {
        let email = Email::parse(email).map_err(|e| Error::Validation(e.to_string()))?;

        let request = RegisterRequest {
            username: username.to_string(),
            email,
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        Ok(self.inner.api.register(&request).await?)
    }

    /// Log out: clear the session (memory and durable storage) and the
    /// local cart mirror. No remote call - the remote cart persists
    /// server-side for the next login. Never fails.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.inner.session.clear();
        self.inner.cart.clear_local();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Place an order for the current cart.
    ///
    /// Rejected locally, without a remote call, when the cart mirror is
    /// empty or the form fails validation. On success the local mirror is
    /// cleared and the created order is not retained - fetch order
    /// history separately. On failure the mirror is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for local rejections, or the remote
    /// failure otherwise.
    #[instrument(skip(self, form))]
    pub async fn checkout(&self, form: &CheckoutForm) -> Result<()> {
        if self.inner.cart.items().is_empty() {
            return Err(Error::Validation(
                "Add products to the cart before checking out".to_string(),
            ));
        }
        form.validate()?;

        self.inner.api.checkout(&form.into()).await?;
        self.inner.cart.clear_local();
        Ok(())
    }
}
