//! In-Memory Backend
//!
//! Mutex-guarded slot map implementing the Backend trait with key expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::backend::{Backend, Payload, Slot};
use crate::error::{CacheError, Result};

// == Memory Backend ==
/// In-memory backing store.
///
/// Every trait call acquires the slot lock exactly once, which is what
/// makes the individual operations atomic. Expired slots are dropped
/// lazily on access; `purge_expired` sweeps them eagerly.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Key-slot storage
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lock ==
    /// Acquires the slot lock.
    ///
    /// A poisoned lock means the store can no longer be trusted, which
    /// surfaces as `Unavailable` rather than a panic.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Slot>>> {
        self.slots
            .lock()
            .map_err(|_| CacheError::Unavailable("slot lock poisoned".to_string()))
    }

    // == Cleanup Expired ==
    /// Removes all expired slots.
    ///
    /// Returns the number of slots removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let mut slots = self.lock()?;

        let expired_keys: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            slots.remove(&key);
        }

        Ok(count)
    }

    // == Length ==
    /// Returns the number of slots currently held, expired ones included.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns true if the backend holds no slots.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

/// Drops the slot at `key` when it has already expired.
fn evict_if_expired(slots: &mut HashMap<String, Slot>, key: &str) {
    if slots.get(key).is_some_and(|slot| slot.is_expired()) {
        slots.remove(key);
    }
}

/// Resolves redis-style inclusive `start`/`stop` indices against a list of
/// `len` elements. Returns None when the range selects nothing.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start >= len || stop < start {
        return None;
    }

    Some((start as usize, stop as usize))
}

impl Backend for MemoryBackend {
    // == Set ==
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut slots = self.lock()?;
        slots.insert(key.to_string(), Slot::bytes(value));
        Ok(())
    }

    // == Set With Expiry ==
    fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut slots = self.lock()?;
        slots.insert(key.to_string(), Slot::bytes_expiring(value, ttl));
        Ok(())
    }

    // == Get ==
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut slots = self.lock()?;
        evict_if_expired(&mut slots, key);

        match slots.get(key) {
            None => Ok(None),
            Some(slot) => match &slot.payload {
                Payload::Bytes(data) => Ok(Some(data.clone())),
                Payload::List(_) => Err(CacheError::WrongKind(key.to_string())),
            },
        }
    }

    // == Increment ==
    fn incr(&self, key: &str) -> Result<i64> {
        let mut slots = self.lock()?;
        evict_if_expired(&mut slots, key);

        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::bytes(b"0".to_vec()));

        match &mut slot.payload {
            Payload::Bytes(data) => {
                let current: i64 = std::str::from_utf8(data)
                    .ok()
                    .and_then(|text| text.parse().ok())
                    .ok_or_else(|| CacheError::WrongKind(key.to_string()))?;
                let next = current + 1;
                *data = next.to_string().into_bytes();
                Ok(next)
            }
            Payload::List(_) => Err(CacheError::WrongKind(key.to_string())),
        }
    }

    // == Append ==
    fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut slots = self.lock()?;
        evict_if_expired(&mut slots, key);

        let slot = slots.entry(key.to_string()).or_insert_with(Slot::list);

        match &mut slot.payload {
            Payload::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            Payload::Bytes(_) => Err(CacheError::WrongKind(key.to_string())),
        }
    }

    // == Range ==
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let mut slots = self.lock()?;
        evict_if_expired(&mut slots, key);

        match slots.get(key) {
            None => Ok(Vec::new()),
            Some(slot) => match &slot.payload {
                Payload::List(items) => Ok(match resolve_range(items.len(), start, stop) {
                    Some((lo, hi)) => items[lo..=hi].to_vec(),
                    None => Vec::new(),
                }),
                Payload::Bytes(_) => Err(CacheError::WrongKind(key.to_string())),
            },
        }
    }
}
