//! Expired Slot Purge Task
//!
//! Background task that periodically removes expired backend slots.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::MemoryBackend;

/// Spawns a background task that periodically purges expired slots.
///
/// Lazy expiry on access already keeps reads correct, so the task is an
/// optimization that bounds how long dead slots hold memory. It runs in
/// an infinite loop, sleeping for the specified interval between sweeps,
/// and stops on its own if the backend becomes unusable.
///
/// # Arguments
/// * `backend` - Shared backend to sweep
/// * `purge_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the
/// task during shutdown.
pub fn spawn_purge_task(backend: Arc<MemoryBackend>, purge_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(purge_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting purge task with interval of {} seconds",
            purge_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            match backend.purge_expired() {
                Ok(removed) if removed > 0 => {
                    info!("Purge: removed {} expired slots", removed);
                }
                Ok(_) => {
                    debug!("Purge: no expired slots found");
                }
                Err(e) => {
                    warn!("Purge task stopping: {e}");
                    break;
                }
            }
        }
    })
}
