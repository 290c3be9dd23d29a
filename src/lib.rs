//! Cachetrace - an instrumented key-value cache
//!
//! Stores values under random keys in a redis-shaped backing store, wraps
//! cache operations with call counting and history recording, replays
//! recorded histories, and fronts page fetches with an expiring cache.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod pages;
pub mod tasks;

pub use backend::{Backend, MemoryBackend};
pub use cache::{replay, transcript, Cache, Counted, Operation, Recorded, StoreOp, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use pages::{Fetch, HttpFetcher, PageCache};
pub use tasks::spawn_purge_task;
