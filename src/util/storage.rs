//! Token persistence backends.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth store persists exactly one key, [`ACCESS_TOKEN_KEY`], through
//! whichever [`TokenStorage`] it was constructed with. Browser builds use
//! `localStorage`; tests and native callers use [`MemoryStorage`].
//!
//! TRADE-OFFS
//! ==========
//! [`LocalStorage`] looks the browser storage object up on every call rather
//! than holding a handle, which keeps it `Send + Sync` for Leptos context.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Storage key holding the raw access token.
pub const ACCESS_TOKEN_KEY: &str = "df_access_token";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed for {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Key/value capability injected into the auth store.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage; contents do not survive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}

/// Browser `window.localStorage`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            _ => Err(StorageError::Unavailable),
        }
    }

    fn write_error(key: &str, err: &wasm_bindgen::JsValue) -> StorageError {
        StorageError::Write { key: key.to_owned(), reason: format!("{err:?}") }
    }
}

#[cfg(feature = "hydrate")]
impl TokenStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let Ok(storage) = Self::storage() else {
            return None;
        };
        match storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("localStorage read failed: key={key} err={err:?}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(|e| Self::write_error(key, &e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?.remove_item(key).map_err(|e| Self::write_error(key, &e))
    }
}
