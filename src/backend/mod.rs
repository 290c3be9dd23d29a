//! Backend Module
//!
//! The backing key-value store interface and its in-memory implementation.

mod entry;
mod memory;

// Re-export public types
pub use entry::{current_timestamp_ms, Payload, Slot};
pub use memory::MemoryBackend;

use std::time::Duration;

use crate::error::{CacheError, Result};

// == Backend Trait ==
/// Operations the backing key-value store provides atomically.
///
/// Each call is individually atomic. The store offers no multi-key
/// transactions, so callers get no cross-key consistency guarantee:
/// two writes touching different keys can interleave with writes from
/// other callers.
pub trait Backend: Send + Sync {
    /// Stores raw bytes under `key`, replacing any previous slot.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores raw bytes under `key` with a time-to-live.
    ///
    /// Once the TTL elapses the backend forgets the slot on its own;
    /// callers never see a stale body after expiry.
    fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Reads the raw bytes at `key`.
    ///
    /// Returns `None` when the key is absent or expired. Absence is not
    /// an error.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer at `key` and returns the new value.
    ///
    /// An absent key counts from zero, so the first increment yields 1.
    fn incr(&self, key: &str) -> Result<i64>;

    /// Appends a byte string to the list at `key`, creating the list when
    /// the key is absent. Returns the new list length.
    fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns the list elements between `start` and `stop` inclusive.
    ///
    /// Negative indices count back from the end of the list, so
    /// `lrange(key, 0, -1)` is the whole list. An absent key yields an
    /// empty sequence.
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;
}

// == Counter Helper ==
/// Reads the integer counter at `key`, treating an absent key as zero.
pub(crate) fn read_counter(backend: &dyn Backend, key: &str) -> Result<i64> {
    match backend.get(key)? {
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| CacheError::Decode {
                key: key.to_string(),
                reason: "counter is not an integer".to_string(),
            }),
        None => Ok(0),
    }
}
