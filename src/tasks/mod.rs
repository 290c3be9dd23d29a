//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Purge: removes expired backend slots at configured intervals

mod purge;

pub use purge::spawn_purge_task;
