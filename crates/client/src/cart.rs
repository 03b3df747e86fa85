//! Local cart mirror, kept consistent with the remote cart.
//!
//! The backend owns the cart; this manager holds an in-memory mirror and
//! reconciles it against remote responses. The mirror follows the
//! session: it is fetched wholesale when a user logs in and cleared
//! locally on logout (the remote cart persists server-side for the next
//! login). The manager also consumes the session's transition channel,
//! so a teardown triggered anywhere (a 401 on any endpoint, not just a
//! cart call) empties the mirror before its next read.
//!
//! Mutations never touch the mirror before their own remote response
//! arrives; the mirror mutex is only taken at completion points, never
//! across a request. Concurrent mutations are not queued, coalesced, or
//! cancelled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::instrument;

use vitrine_core::{CartItemId, ProductId};

use crate::api::ApiClient;
use crate::api::types::CartItem;
use crate::error::{Error, Result};
use crate::session::{SessionEvent, SessionStore};

/// Manager for the local cart mirror.
///
/// Cheaply cloneable; all clones share the same mirror.
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<CartInner>,
}

struct CartInner {
    api: ApiClient,
    session: SessionStore,
    session_events: Mutex<watch::Receiver<SessionEvent>>,
    items: Mutex<Vec<CartItem>>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight count when a mutating operation resolves,
/// successfully or not.
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl CartManager {
    /// Create a cart manager over the given API client and session store.
    ///
    /// The mirror starts empty; call [`reload`](Self::reload) after the
    /// session is known.
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        let session_events = Mutex::new(session.subscribe());
        Self {
            inner: Arc::new(CartInner {
                api,
                session,
                session_events,
                items: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Synchronize the mirror with the session.
    ///
    /// Authenticated: fetch the full remote cart and replace the mirror
    /// wholesale. Anonymous: clear the mirror locally, no remote call.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails; the mirror is left
    /// empty in that case.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<()> {
        self.sync_with_session();
        if !self.inner.session.is_authenticated() {
            self.clear_local();
            return Ok(());
        }

        let _busy = BusyGuard::enter(&self.inner.in_flight);
        match self.inner.api.cart_items().await {
            Ok(items) => {
                *self.lock_items() = items;
                Ok(())
            }
            Err(e) => {
                self.clear_local();
                Err(e.into())
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// Requires an authenticated session; anonymous calls are rejected
    /// locally without a remote request. The backend merges with any
    /// existing line for this product and its response is authoritative:
    /// the mirror replaces the matching line or appends a new one.
    ///
    /// Two overlapping calls for the same product are not coalesced; the
    /// last response to resolve wins in the mirror, so racing increments
    /// can lose an update. No resolution policy is defined for that race.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when anonymous, or the remote
    /// failure otherwise (mirror untouched).
    #[instrument(skip(self), fields(product_id = %product_id, quantity = quantity))]
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<CartItem> {
        self.sync_with_session();
        if !self.inner.session.is_authenticated() {
            return Err(Error::Validation(
                "Log in to add products to the cart".to_string(),
            ));
        }

        let _busy = BusyGuard::enter(&self.inner.in_flight);
        let line = self.inner.api.add_cart_item(product_id, quantity).await?;

        reconcile(&mut self.lock_items(), line.clone());
        Ok(line)
    }

    /// Remove a line from the cart by its line-item id.
    ///
    /// Pessimistic: the mirror drops the line only after the backend
    /// confirms the removal, so a failed call never shows a line as gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote removal fails (mirror untouched).
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: CartItemId) -> Result<()> {
        self.sync_with_session();
        let _busy = BusyGuard::enter(&self.inner.in_flight);
        self.inner.api.remove_cart_item(item_id).await?;

        self.lock_items().retain(|item| item.id != item_id);
        Ok(())
    }

    /// Snapshot of the current mirror.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.sync_with_session();
        self.lock_items().clone()
    }

    /// Sum of each line's backend-computed total. Never recomputes
    /// price x quantity locally.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.sync_with_session();
        self.lock_items().iter().map(|item| item.line_total).sum()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.sync_with_session();
        self.lock_items().iter().map(|item| item.quantity).sum()
    }

    /// True while any mutating round trip is unresolved.
    ///
    /// Dependents may use this to disable concurrent re-invocation; the
    /// manager itself does not enforce mutual exclusion.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Reset the mirror without a remote call.
    ///
    /// Used on logout and after checkout: checkout completion is itself
    /// the remote-side signal that the cart is consumed.
    pub fn clear_local(&self) {
        self.lock_items().clear();
    }

    /// Apply any session transition published since the last call.
    ///
    /// The session store publishes every transition on its watch channel;
    /// the mirror consumes pending ones at each of its own boundaries, so
    /// a teardown observed by any endpoint (a 401 on an orders fetch, a
    /// logout through the store directly) clears the mirror before the
    /// next cart read or mutation.
    fn sync_with_session(&self) {
        let mut events = self
            .inner
            .session_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !events.has_changed().unwrap_or(false) {
            return;
        }
        let event = events.borrow_and_update().clone();
        drop(events);

        match event {
            SessionEvent::LoggedOut | SessionEvent::Expired => self.clear_local(),
            // Login reloads are driven explicitly by the facade.
            SessionEvent::LoggedIn(_) => {}
        }
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.inner
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn seed(&self, items: Vec<CartItem>) {
        *self.lock_items() = items;
    }
}

/// Merge an authoritative line into the mirror by product identity:
/// replace the existing line for that product, or append.
fn reconcile(items: &mut Vec<CartItem>, line: CartItem) {
    match items
        .iter_mut()
        .find(|item| item.product_id == line.product_id)
    {
        Some(existing) => *existing = line,
        None => items.push(line),
    }
}
