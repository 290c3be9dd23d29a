//! Error types for the instrumented cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its collaborators.
///
/// Absent keys are not errors: lookups return `Option::None` and callers
/// must check for absence.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store could not be reached or is no longer usable
    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded into the requested shape
    #[error("failed to decode value at '{key}': {reason}")]
    Decode { key: String, reason: String },

    /// A history record could not be serialized
    #[error("failed to encode history record: {0}")]
    Encode(String),

    /// An operation was applied to a key holding the wrong kind of value
    #[error("wrong value kind at '{0}'")]
    WrongKind(String),

    /// An instrumented operation was invoked with a malformed argument list
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The page fetcher failed to set itself up or retrieve a resource
    #[error("fetcher error: {0}")]
    Fetcher(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
