//! Wire types for the storefront backend.
//!
//! Field names mirror the backend's snake_case JSON exactly; where the
//! wire name is unhelpful (`product_price`, `total_price`) the Rust field
//! carries the domain name and a serde rename. Money is decimal, never
//! recomputed locally: `line_total` is trusted as the backend computed it.
//!
//! Timestamps are carried as opaque strings - the backend emits plain
//! `YYYY-MM-DD HH:MM:SS` values and the client only ever displays them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{
    CartItemId, CategoryId, Email, OrderId, OrderStatus, PaymentMethod, ProductId, UserId,
};

// =============================================================================
// Authentication
// =============================================================================

/// Request body for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body of `POST /auth/login`.
///
/// The login endpoint returns only a credential; profile data is
/// synthesized locally (see `Storefront::login`).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub full_name: String,
}

/// A user as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

impl UserIdentity {
    /// Placeholder identity synthesized after login, until a dedicated
    /// profile fetch exists. Profile fields are empty and the id is 0.
    #[must_use]
    pub fn placeholder(username: &str) -> Self {
        Self {
            id: UserId::new(0),
            username: username.to_string(),
            email: String::new(),
            full_name: String::new(),
            is_active: true,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
    pub created_at: String,
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the remote cart.
///
/// At most one line exists per `(user_id, product_id)`; the backend merges
/// on add. `line_total` is computed server-side and trusted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub product_name: String,
    #[serde(rename = "product_price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "total_price", with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

/// Request body for `POST /cart/add`.
#[derive(Debug, Serialize)]
pub struct AddCartItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Orders
// =============================================================================

/// Request body for `POST /orders/checkout`.
#[derive(Debug, Serialize)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// A placed order, immutable client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: String,
    pub items: Vec<OrderItem>,
}
