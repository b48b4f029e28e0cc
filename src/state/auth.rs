//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AuthStore` is constructed at startup and handed to the API client
//! (for bearer headers) and to the component tree (see `crate::context`).
//! Components observe it through [`AuthStore::subscribe`].
//!
//! DESIGN
//! ======
//! The in-memory token and the persisted token move together: `set_token`
//! writes storage then state, `reset` clears both. `fetch_me` is the one
//! exception by construction: it re-reads the token from storage rather than
//! memory when it installs the fetched user. A store built without storage
//! skips every write and reads back an empty token.
//!
//! Transitions are not validated. `set_user(None)` leaves the token alone,
//! so consumers must tolerate a token without a user.
//!
//! Locks are never held across an await or while listeners run, so a
//! listener may call back into the store.
//!
//! Snapshots are queued under the state lock and delivered in FIFO order by
//! whichever caller finds no delivery in progress. A change made from inside
//! a listener, or from another thread mid-delivery, is appended and reaches
//! every listener after the current snapshot. Every listener therefore sees
//! states in mutation order and ends on the store's current state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::net::api::{ApiClient, ApiError};
use crate::net::transport::Transport;
use crate::net::types::{AuthState, User};
use crate::util::storage::{ACCESS_TOKEN_KEY, StorageError, TokenStorage};

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// Failure of a flow that both calls the API and persists a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

struct Inner {
    state: Mutex<AuthState>,
    storage: Option<Arc<dyn TokenStorage>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    delivery: Mutex<Delivery>,
}

/// Snapshots awaiting delivery, and whether some caller is draining them.
#[derive(Default)]
struct Delivery {
    pending: VecDeque<AuthState>,
    draining: bool,
}

/// Observable authentication state, cheap to clone.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStore")
            .field("authenticated", &self.state().is_authenticated())
            .field("persistent", &self.inner.storage.is_some())
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Empty store persisting through `storage`, or nowhere when `None`.
    pub fn new(storage: Option<Arc<dyn TokenStorage>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(AuthState::default()),
                storage,
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                delivery: Mutex::new(Delivery::default()),
            }),
        }
    }

    pub fn with_storage(storage: Arc<dyn TokenStorage>) -> Self {
        Self::new(Some(storage))
    }

    /// Store with no persistence, as outside a browser.
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// Store seeded with the token already persisted in `storage`, e.g.
    /// after a page reload. The user is left empty until `fetch_me`.
    pub fn restore(storage: Arc<dyn TokenStorage>) -> Self {
        let store = Self::with_storage(storage);
        let token = store.stored_token();
        if !token.is_empty() {
            log::debug!("restored persisted access token");
            store.lock_state().access_token = token;
        }
        store
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.lock_state().clone()
    }

    /// Current in-memory token; empty when unauthenticated.
    pub fn access_token(&self) -> String {
        self.lock_state().access_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock_state().user.clone()
    }

    /// Register `listener`. It runs once right away with the current state,
    /// then after every change until the returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        self.lock_listeners().push((id, Arc::clone(&listener)));
        let current = self.state();
        listener(&current);
        Subscription { store: Arc::downgrade(&self.inner), id }
    }

    /// Persist `token`, then set it in memory keeping the current user.
    ///
    /// # Errors
    ///
    /// Returns the storage error and leaves state untouched if the write
    /// fails.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), StorageError> {
        let token = token.into();
        self.persist_token(&token)?;
        self.update(|state| state.access_token = token);
        Ok(())
    }

    /// Replace only the user; the token is left as-is.
    pub fn set_user(&self, user: Option<User>) {
        self.update(|state| state.user = user);
    }

    /// Remove the persisted token and return to the initial empty state.
    ///
    /// # Errors
    ///
    /// Returns the storage error and leaves state untouched if the removal
    /// fails.
    pub fn reset(&self) -> Result<(), StorageError> {
        if let Some(storage) = &self.inner.storage {
            storage.remove(ACCESS_TOKEN_KEY)?;
        }
        self.replace(AuthState::default());
        Ok(())
    }

    /// Load the current user from `GET /me` and install it.
    ///
    /// On success the whole state becomes `{persisted token, fetched user}`.
    /// Concurrent calls are independent; the last to complete wins.
    ///
    /// # Errors
    ///
    /// Propagates the client's error; state is unchanged on failure.
    pub async fn fetch_me<T: Transport>(&self, api: &ApiClient<T>) -> Result<User, ApiError> {
        let me = api.me().await?;
        let user = me.data;
        log::debug!("fetched current user: id={} username={}", user.id, user.username);
        self.replace(AuthState { access_token: self.stored_token(), user: Some(user.clone()) });
        Ok(user)
    }

    /// Finish the GitHub OAuth round-trip: exchange `code`/`state`, persist
    /// the issued access token, and install it with the returned user as a
    /// single change.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] if the exchange fails (state untouched),
    /// [`AuthError::Storage`] if the token cannot be persisted.
    pub async fn complete_github_login<T: Transport>(
        &self,
        api: &ApiClient<T>,
        code: &str,
        state: &str,
    ) -> Result<User, AuthError> {
        let result = api.auth_callback(code, state).await?.data;
        let access_token = result.token.access_token;
        self.persist_token(&access_token)?;
        self.replace(AuthState { access_token, user: Some(result.user.clone()) });
        Ok(result.user)
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn stored_token(&self) -> String {
        self.inner
            .storage
            .as_ref()
            .and_then(|storage| storage.get(ACCESS_TOKEN_KEY))
            .unwrap_or_default()
    }

    fn persist_token(&self, token: &str) -> Result<(), StorageError> {
        match &self.inner.storage {
            Some(storage) => storage.set(ACCESS_TOKEN_KEY, token),
            None => Ok(()),
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut AuthState)) {
        {
            let mut state = self.lock_state();
            mutate(&mut *state);
            // Enqueue before the state lock drops so queue order is mutation order.
            self.lock_delivery().pending.push_back(state.clone());
        }
        self.drain();
    }

    fn replace(&self, next: AuthState) {
        self.update(|state| *state = next);
    }

    /// Deliver queued snapshots until none remain, unless another caller
    /// (an outer frame on this thread or another thread) is already doing so.
    fn drain(&self) {
        {
            let mut delivery = self.lock_delivery();
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }
        let _guard = DrainGuard(&self.inner);
        loop {
            let next = {
                let mut delivery = self.lock_delivery();
                let Some(next) = delivery.pending.pop_front() else {
                    delivery.draining = false;
                    return;
                };
                next
            };
            self.notify(&next);
        }
    }

    fn notify(&self, snapshot: &AuthState) {
        let listeners: Vec<Listener> = self.lock_listeners().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AuthState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_delivery(&self) -> std::sync::MutexGuard<'_, Delivery> {
        self.inner.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
        self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the drain flag if a listener panics, so later updates still
/// deliver.
struct DrainGuard<'a>(&'a Inner);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut delivery = self.0.delivery.lock().unwrap_or_else(PoisonError::into_inner);
            delivery.pending.clear();
            delivery.draining = false;
        }
    }
}

/// Listener registration guard. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    store: Weak<Inner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}
