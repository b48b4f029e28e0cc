//! Leptos context wiring for the auth store and API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component constructs one `AuthStore` and one `ApiClient` and
//! provides them here; components pull them back out with the `use_*`
//! helpers instead of reaching for module-level globals. Render code reads
//! the `RwSignal<AuthState>` mirror so it tracks changes like any signal.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::*;

use crate::net::api::ApiClient;
use crate::net::transport::Transport;
use crate::net::types::AuthState;
use crate::state::auth::AuthStore;

/// Provide `store` and a signal mirror of its state to the current owner.
///
/// The mirror stays subscribed until the owner is cleaned up.
pub fn provide_auth(store: AuthStore) -> RwSignal<AuthState> {
    let mirror = RwSignal::new(store.state());
    let subscription = store.subscribe(move |state| {
        if mirror.try_set(state.clone()).is_some() {
            log::debug!("auth mirror disposed; dropping update");
        }
    });
    on_cleanup(move || drop(subscription));
    provide_context(store);
    provide_context(mirror);
    mirror
}

pub fn use_auth_store() -> Option<AuthStore> {
    use_context::<AuthStore>()
}

pub fn use_auth_state() -> Option<RwSignal<AuthState>> {
    use_context::<RwSignal<AuthState>>()
}

pub fn provide_api_client<T>(api: ApiClient<T>)
where
    T: Transport + Clone + Send + Sync + 'static,
{
    provide_context(api);
}

pub fn use_api_client<T>() -> Option<ApiClient<T>>
where
    T: Transport + Clone + Send + Sync + 'static,
{
    use_context::<ApiClient<T>>()
}
