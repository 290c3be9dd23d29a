//! Cache Store Module
//!
//! Stores values under freshly generated random keys and reads them back,
//! optionally through a decoder.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::backend::Backend;
use crate::cache::Value;
use crate::error::{CacheError, Result};

// == Cache ==
/// Key-value cache over an explicitly supplied backing store.
///
/// The backend handle is passed in at construction, so its lifecycle stays
/// in the caller's hands; cloning a `Cache` clones only the handle.
#[derive(Clone)]
pub struct Cache {
    /// Backing key-value store
    backend: Arc<dyn Backend>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache writing through the given backing store.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Handle to the backing store this cache writes through.
    pub fn backend(&self) -> Arc<dyn Backend> {
        self.backend.clone()
    }

    // == Store ==
    /// Persists `value` under a fresh random key and returns the key.
    ///
    /// Keys are v4 UUIDs, so two stores collide only with negligible
    /// probability, even across concurrent callers sharing one backend.
    /// The only failure mode is the backing store's own.
    pub fn store(&self, value: impl Into<Value>) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.backend.set(&key, value.into().to_bytes())?;
        Ok(key)
    }

    // == Get ==
    /// Reads the raw bytes at `key`.
    ///
    /// Absent keys are `None`, not errors.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key)
    }

    /// Reads the value at `key` through `decoder`.
    ///
    /// A decoder failure surfaces as `CacheError::Decode`; an absent key
    /// is `None` and the decoder never runs.
    pub fn get_with<T, E: fmt::Display>(
        &self,
        key: &str,
        decoder: impl FnOnce(&[u8]) -> std::result::Result<T, E>,
    ) -> Result<Option<T>> {
        match self.backend.get(key)? {
            None => Ok(None),
            Some(raw) => decoder(&raw).map(Some).map_err(|e| CacheError::Decode {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Reads the value at `key` as UTF-8 text.
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| String::from_utf8(raw.to_vec()))
    }

    /// Reads the value at `key` as a decimal integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(raw)
                .map_err(|e| e.to_string())
                .and_then(|text| text.parse::<i64>().map_err(|e| e.to_string()))
        })
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}
