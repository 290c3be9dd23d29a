//! Backend Slot Module
//!
//! Defines the storage slots held by the in-memory backend, with expiry support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Slot Payload ==
/// The two kinds of data a slot can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw byte string, written by set / set_ex / incr
    Bytes(Vec<u8>),
    /// Ordered list of byte strings, written by rpush
    List(Vec<Vec<u8>>),
}

// == Slot ==
/// A single keyed storage slot with optional expiry.
#[derive(Debug, Clone)]
pub struct Slot {
    /// The stored payload
    pub payload: Payload,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl Slot {
    // == Constructors ==
    /// Creates a byte slot without expiry.
    pub fn bytes(data: Vec<u8>) -> Self {
        Self {
            payload: Payload::Bytes(data),
            expires_at: None,
        }
    }

    /// Creates a byte slot that expires after `ttl`.
    pub fn bytes_expiring(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            payload: Payload::Bytes(data),
            expires_at: Some(current_timestamp_ms() + ttl.as_millis() as u64),
        }
    }

    /// Creates an empty list slot without expiry.
    pub fn list() -> Self {
        Self {
            payload: Payload::List(Vec::new()),
            expires_at: None,
        }
    }

    // == Is Expired ==
    /// Checks if the slot has expired.
    ///
    /// Boundary condition: a slot is expired when the current time is
    /// greater than or equal to the expiration time, so a slot whose TTL
    /// has fully elapsed is immediately gone.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_slot_no_expiry() {
        let slot = Slot::bytes(b"value".to_vec());

        assert_eq!(slot.payload, Payload::Bytes(b"value".to_vec()));
        assert!(slot.expires_at.is_none());
        assert!(!slot.is_expired());
    }

    #[test]
    fn test_slot_with_ttl() {
        let slot = Slot::bytes_expiring(b"value".to_vec(), Duration::from_secs(60));

        assert!(slot.expires_at.is_some());
        assert!(!slot.is_expired());
    }

    #[test]
    fn test_slot_expiration() {
        let slot = Slot::bytes_expiring(b"value".to_vec(), Duration::from_secs(1));

        assert!(!slot.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(slot.is_expired());
    }

    #[test]
    fn test_list_slot_never_expires() {
        let slot = Slot::list();

        assert_eq!(slot.payload, Payload::List(Vec::new()));
        assert!(!slot.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let slot = Slot {
            payload: Payload::Bytes(b"value".to_vec()),
            expires_at: Some(current_timestamp_ms()), // Expires exactly now
        };

        assert!(slot.is_expired(), "Slot should be expired at boundary");
    }
}
