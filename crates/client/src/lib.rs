//! Vitrine storefront client library.
//!
//! Talks to the remote storefront backend (REST/JSON) and keeps the local
//! session and cart mirror consistent with it.
//!
//! # Architecture
//!
//! - [`session`] - durable authentication state (token + identity), the
//!   single source of truth for "who is logged in"
//! - [`api`] - typed request boundary to the backend, with bearer-token
//!   injection and global 401 teardown
//! - [`cart`] - in-memory cart mirror, reconciled against remote responses
//! - [`storefront`] - facade wiring the above together: session transitions
//!   drive cart reloads and clears
//!
//! The backend is the source of truth for everything it stores; the client
//! never recomputes prices and never caches or retries requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_client::{ClientConfig, Storefront};
//!
//! let config = ClientConfig::from_env()?;
//! let store = Storefront::new(config).await?;
//!
//! store.login("alice", "secret").await?;
//! store.cart().add_to_cart(ProductId::new(7), 2).await?;
//! println!("cart total: {}", store.cart().total());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod storefront;

pub use api::{ApiClient, ApiError};
pub use cart::CartManager;
pub use checkout::CheckoutForm;
pub use config::{ClientConfig, ConfigError};
pub use error::{Error, Result};
pub use session::{SessionEvent, SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, StoredSession};
pub use storefront::Storefront;
