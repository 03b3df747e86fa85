//! REST client implementation.
//!
//! One shared request path handles bearer injection, the global 401
//! contract, and error-body mapping; the public methods are direct
//! mappings to backend endpoints.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::instrument;

use vitrine_core::{CartItemId, CategoryId, ProductId};

use crate::api::ApiError;
use crate::api::types::{
    AddCartItemRequest, CartItem, Category, CheckoutRequest, LoginRequest, Order, Product,
    RegisterRequest, TokenResponse, UserIdentity,
};
use crate::config::ClientConfig;
use crate::session::SessionStore;

/// Client for the storefront backend.
///
/// Cheaply cloneable. Holds a handle to the session store: the current
/// token is read per-request, and a 401 anywhere tears the session down
/// before the error surfaces.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                session,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and return the successful response body.
    ///
    /// Attaches the current bearer token when one is present (absence is
    /// not an error here - some endpoints are anonymous). A 401 triggers
    /// the global session teardown before returning; any other
    /// non-success status maps to [`ApiError::Status`] carrying the
    /// backend's `detail` message when it sent one.
    async fn run(&self, builder: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let builder = match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            // Global side effect, independent of which call triggered it.
            self.inner.session.force_teardown();
            return Err(ApiError::Unauthorized {
                message: extract_detail(&text)
                    .unwrap_or_else(|| "Authentication required".to_string()),
            });
        }

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %text.chars().take(200).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_detail(&text)
                    .unwrap_or_else(|| format!("Request failed (HTTP {status})")),
            });
        }

        Ok(text)
    }

    /// Send a request and parse the successful response body as JSON.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.run(builder).await?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(200).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] with the backend's message on
    /// bad credentials, or any other request failure.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.execute(self.inner.http.post(self.endpoint("/auth/login")).json(&body))
            .await
    }

    /// `POST /auth/register`
    ///
    /// Does not establish a session; the created user must log in
    /// separately.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserIdentity, ApiError> {
        self.execute(
            self.inner
                .http
                .post(self.endpoint("/auth/register"))
                .json(request),
        )
        .await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// `GET /categories`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.execute(self.inner.http.get(self.endpoint("/categories")))
            .await
    }

    /// `GET /products`, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, category_id: Option<CategoryId>) -> Result<Vec<Product>, ApiError> {
        let mut builder = self.inner.http.get(self.endpoint("/products"));
        if let Some(id) = category_id {
            builder = builder.query(&[("category_id", id.as_i32())]);
        }
        self.execute(builder).await
    }

    /// `GET /products/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        self.execute(
            self.inner
                .http
                .get(self.endpoint(&format!("/products/{product_id}"))),
        )
        .await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// `GET /cart`
    ///
    /// # Errors
    ///
    /// Returns an error if the session is rejected or the request fails.
    #[instrument(skip(self))]
    pub async fn cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
        self.execute(self.inner.http.get(self.endpoint("/cart"))).await
    }

    /// `POST /cart/add`
    ///
    /// The backend merges with an existing line for the same product and
    /// returns the resulting line, which is authoritative.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown, stock is insufficient,
    /// the session is rejected, or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id, quantity = quantity))]
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        let body = AddCartItemRequest {
            product_id,
            quantity,
        };
        self.execute(self.inner.http.post(self.endpoint("/cart/add")).json(&body))
            .await
    }

    /// `DELETE /cart/{itemId}`
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist, the session is
    /// rejected, or the request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), ApiError> {
        self.run(
            self.inner
                .http
                .delete(self.endpoint(&format!("/cart/{item_id}"))),
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `GET /orders`
    ///
    /// # Errors
    ///
    /// Returns an error if the session is rejected or the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.execute(self.inner.http.get(self.endpoint("/orders")))
            .await
    }

    /// `POST /orders/checkout`
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty server-side, the session is
    /// rejected, or the request fails.
    #[instrument(skip(self, request))]
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<Order, ApiError> {
        self.execute(
            self.inner
                .http
                .post(self.endpoint("/orders/checkout"))
                .json(request),
        )
        .await
    }
}

/// Extract the backend's structured `detail` message from an error body.
///
/// The backend sends `{"detail": ...}` where `detail` is usually a string
/// but can be structured (validation errors); non-string values are
/// rendered as JSON.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
