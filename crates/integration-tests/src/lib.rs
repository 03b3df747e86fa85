//! In-process fake storefront backend for integration tests.
//!
//! Speaks the same REST/JSON surface as the real backend, including its
//! error convention (`{"detail": "..."}` bodies) and its cart semantics:
//! one line per `(user, product)`, merged server-side on add. Tests spin
//! one up on an ephemeral port and point a [`vitrine_client::Storefront`]
//! at it.
//!
//! ```rust,ignore
//! let backend = TestBackend::start().await;
//! let store = Storefront::with_storage(backend.config(session_file), storage).await?;
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post};
use serde::Deserialize;
use serde_json::{Value, json};

use vitrine_client::ClientConfig;

type Shared = Arc<Mutex<BackendState>>;
type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

// =============================================================================
// Backend State
// =============================================================================

struct User {
    id: i32,
    username: String,
    email: String,
    password: String,
    full_name: String,
}

struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: f64,
    stock: u32,
    category_id: i32,
}

struct CartRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: u32,
}

struct BackendState {
    users: Vec<User>,
    tokens: HashMap<String, i32>,
    token_counter: u64,
    products: Vec<ProductRow>,
    cart: Vec<CartRow>,
    next_cart_id: i32,
    orders: Vec<Value>,
    next_order_id: i32,
    next_user_id: i32,
}

impl BackendState {
    fn seeded() -> Self {
        Self {
            users: vec![User {
                id: 1,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
                full_name: "Alice Lima".to_string(),
            }],
            tokens: HashMap::new(),
            token_counter: 0,
            products: vec![
                ProductRow {
                    id: 7,
                    name: "Mechanical Keyboard".to_string(),
                    description: "Tenkeyless, brown switches".to_string(),
                    price: 199.5,
                    stock: 10,
                    category_id: 2,
                },
                ProductRow {
                    id: 8,
                    name: "Paperback Novel".to_string(),
                    description: String::new(),
                    price: 39.25,
                    stock: 3,
                    category_id: 1,
                },
                ProductRow {
                    id: 9,
                    name: "Wireless Headset".to_string(),
                    description: "Out of stock on purpose".to_string(),
                    price: 120.0,
                    stock: 0,
                    category_id: 2,
                },
            ],
            cart: Vec::new(),
            next_cart_id: 1,
            orders: Vec::new(),
            next_order_id: 1,
            next_user_id: 2,
        }
    }

    fn product(&self, id: i32) -> Option<&ProductRow> {
        self.products.iter().find(|p| p.id == id)
    }
}

// =============================================================================
// Test Handle
// =============================================================================

/// Handle to a running fake backend.
pub struct TestBackend {
    addr: SocketAddr,
    state: Shared,
}

impl TestBackend {
    /// Start a fake backend on an ephemeral local port.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake backend");
        });

        Self { addr, state }
    }

    /// Base URL of the running backend.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Build a client configuration pointing at this backend.
    #[must_use]
    pub fn config(&self, session_file: PathBuf) -> ClientConfig {
        let api_url = url::Url::parse(&self.url()).expect("backend url is valid");
        ClientConfig::new(api_url, session_file)
    }

    /// Invalidate every issued token, so the next authenticated request
    /// gets a 401.
    pub fn revoke_all_tokens(&self) {
        self.lock().tokens.clear();
    }

    /// Override a product's stock level.
    pub fn set_stock(&self, product_id: i32, stock: u32) {
        let mut state = self.lock();
        if let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) {
            product.stock = stock;
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Shared) -> axum::Router {
    axum::Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/categories", get(categories))
        .route("/products", get(products))
        .route("/products/{id}", get(product))
        .route("/cart", get(cart_items))
        .route("/cart/add", post(cart_add))
        .route("/cart/{id}", delete(cart_remove))
        .route("/orders", get(orders))
        .route("/orders/checkout", post(checkout))
        .with_state(state)
}

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

/// Resolve the bearer token in `headers` to a user id.
fn authenticate(
    state: &BackendState,
    headers: &HeaderMap,
) -> Result<i32, (StatusCode, Json<Value>)> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token).copied())
        .ok_or_else(unauthorized)
}

fn cart_line_json(state: &BackendState, row: &CartRow) -> Value {
    let product = state.product(row.product_id).expect("cart row references a product");
    json!({
        "id": row.id,
        "user_id": row.user_id,
        "product_id": row.product_id,
        "quantity": row.quantity,
        "product_name": product.name,
        "product_price": product.price,
        "total_price": product.price * f64::from(row.quantity),
    })
}

// =============================================================================
// Auth Handlers
// =============================================================================

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> ApiResult {
    let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    let user_id = state
        .users
        .iter()
        .find(|u| u.username == body.username && u.password == body.password)
        .map(|u| u.id)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"))?;

    state.token_counter += 1;
    let token = format!("token-{}-{}", user_id, state.token_counter);
    state.tokens.insert(token.clone(), user_id);

    Ok(Json(json!({ "access_token": token, "token_type": "bearer" })))
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    full_name: String,
}

async fn register(State(state): State<Shared>, Json(body): Json<RegisterBody>) -> ApiResult {
    let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    if state
        .users
        .iter()
        .any(|u| u.username == body.username || u.email == body.email)
    {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Username or email already registered",
        ));
    }

    let id = state.next_user_id;
    state.next_user_id += 1;
    state.users.push(User {
        id,
        username: body.username.clone(),
        email: body.email.clone(),
        password: body.password,
        full_name: body.full_name.clone(),
    });

    Ok(Json(json!({
        "id": id,
        "username": body.username,
        "email": body.email,
        "full_name": body.full_name,
        "is_active": true,
    })))
}

// =============================================================================
// Catalog Handlers
// =============================================================================

async fn categories() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Books", "description": null, "created_at": "2026-01-01T00:00:00Z" },
        { "id": 2, "name": "Electronics", "description": "Gadgets", "created_at": "2026-01-01T00:00:00Z" },
    ]))
}

#[derive(Deserialize)]
struct ProductFilter {
    category_id: Option<i32>,
}

fn product_json(p: &ProductRow) -> Value {
    json!({
        "id": p.id,
        "name": p.name,
        "description": p.description,
        "price": p.price,
        "stock": p.stock,
        "category_id": p.category_id,
        "image_url": null,
        "created_at": "2026-01-01T00:00:00Z",
    })
}

async fn products(State(state): State<Shared>, Query(filter): Query<ProductFilter>) -> Json<Value> {
    let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let rows: Vec<Value> = state
        .products
        .iter()
        .filter(|p| filter.category_id.is_none_or(|c| p.category_id == c))
        .map(product_json)
        .collect();
    Json(Value::Array(rows))
}

async fn product(State(state): State<Shared>, Path(id): Path<i32>) -> ApiResult {
    let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    state
        .product(id)
        .map(|p| Json(product_json(p)))
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))
}

// =============================================================================
// Cart Handlers
// =============================================================================

async fn cart_items(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let user_id = authenticate(&state, &headers)?;

    let lines: Vec<Value> = state
        .cart
        .iter()
        .filter(|row| row.user_id == user_id)
        .map(|row| cart_line_json(&state, row))
        .collect();
    Ok(Json(Value::Array(lines)))
}

#[derive(Deserialize)]
struct AddBody {
    product_id: i32,
    quantity: u32,
}

async fn cart_add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<AddBody>,
) -> ApiResult {
    let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let user_id = authenticate(&state, &headers)?;

    let stock = state
        .product(body.product_id)
        .map(|p| p.stock)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))?;

    let merged_quantity = state
        .cart
        .iter()
        .find(|row| row.user_id == user_id && row.product_id == body.product_id)
        .map_or(body.quantity, |row| row.quantity + body.quantity);
    if merged_quantity > stock {
        return Err(detail(StatusCode::BAD_REQUEST, "Insufficient stock"));
    }

    let row_id = if let Some(row) = state
        .cart
        .iter_mut()
        .find(|row| row.user_id == user_id && row.product_id == body.product_id)
    {
        row.quantity = merged_quantity;
        row.id
    } else {
        let id = state.next_cart_id;
        state.next_cart_id += 1;
        state.cart.push(CartRow {
            id,
            user_id,
            product_id: body.product_id,
            quantity: body.quantity,
        });
        id
    };

    let row = state.cart.iter().find(|row| row.id == row_id).unwrap();
    Ok(Json(cart_line_json(&state, row)))
}

async fn cart_remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> ApiResult {
    let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let user_id = authenticate(&state, &headers)?;

    let before = state.cart.len();
    state.cart.retain(|row| !(row.id == id && row.user_id == user_id));
    if state.cart.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Cart item not found"));
    }
    Ok(Json(json!({ "message": "Item removed from cart" })))
}

// =============================================================================
// Order Handlers
// =============================================================================

async fn orders(State(state): State<Shared>, headers: HeaderMap) -> ApiResult {
    let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let user_id = authenticate(&state, &headers)?;

    let rows: Vec<Value> = state
        .orders
        .iter()
        .filter(|o| o["user_id"] == json!(user_id))
        .cloned()
        .collect();
    Ok(Json(Value::Array(rows)))
}

#[derive(Deserialize)]
struct CheckoutBody {
    shipping_address: String,
    payment_method: String,
}

async fn checkout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CheckoutBody>,
) -> ApiResult {
    let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let user_id = authenticate(&state, &headers)?;

    let lines: Vec<&CartRow> = state.cart.iter().filter(|row| row.user_id == user_id).collect();
    if lines.is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "Cart is empty"));
    }

    let mut total = 0.0;
    let mut items = Vec::new();
    for row in &lines {
        let product = state.product(row.product_id).expect("cart row references a product");
        total += product.price * f64::from(row.quantity);
        items.push(json!({
            "product_id": row.product_id,
            "quantity": row.quantity,
            "price": product.price,
        }));
    }

    let order = json!({
        "id": state.next_order_id,
        "user_id": user_id,
        "total_amount": total,
        "shipping_address": body.shipping_address,
        "payment_method": body.payment_method,
        "status": "pending",
        "created_at": "2026-08-29T12:00:00Z",
        "items": items,
    });
    state.next_order_id += 1;
    state.orders.push(order.clone());
    state.cart.retain(|row| row.user_id != user_id);

    Ok(Json(order))
}
