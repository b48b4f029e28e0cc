//! # draftforge-client
//!
//! Data-access layer for the DraftForge web frontend: a JSON request client
//! that attaches bearer credentials and normalizes the response envelope, and
//! an observable auth-session store persisted to browser storage.
//!
//! The browser build (`hydrate`) talks HTTP through `gloo-net` and persists
//! the access token in `localStorage`. The `native` build swaps in `reqwest`.
//! Both seams (`Transport`, `TokenStorage`) are injected at construction, so
//! the crate runs unchanged under plain `cargo test`.

pub mod config;
pub mod context;
pub mod net;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use net::api::{ApiClient, ApiError, RequestOptions};
pub use net::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use net::types::{ApiResponse, AuthState, ErrorResponse, User};
pub use state::auth::{AuthStore, Subscription};
pub use util::storage::{ACCESS_TOKEN_KEY, MemoryStorage, StorageError, TokenStorage};
