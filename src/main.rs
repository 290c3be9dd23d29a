//! Cachetrace demo binary
//!
//! Exercises each library contract against a fresh in-memory backend:
//! store/get round trips, instrumented store calls with a replayed
//! transcript, and the expiring page cache over a live HTTP fetcher.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cachetrace::{
    spawn_purge_task, transcript, Cache, Config, Counted, HttpFetcher, MemoryBackend, Operation,
    PageCache, Recorded, StoreOp,
};

/// Demo entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the in-memory backend
/// 4. Start the background purge task
/// 5. Run the demonstration off the async runtime
/// 6. Stop the purge task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachetrace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cachetrace demo");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: page_ttl={}s, purge_interval={}s, fetch_timeout={}s",
        config.page_ttl, config.purge_interval, config.fetch_timeout
    );

    let backend = Arc::new(MemoryBackend::new());
    let purge_handle = spawn_purge_task(backend.clone(), config.purge_interval);
    info!("Background purge task started");

    // The library surface is blocking, so the demo runs off the runtime
    let demo_backend = backend.clone();
    let outcome = tokio::task::spawn_blocking(move || demo(demo_backend, config)).await?;

    purge_handle.abort();
    info!("Demo complete");
    outcome
}

/// Walks through each contract, printing what the library returns.
fn demo(backend: Arc<MemoryBackend>, config: Config) -> anyhow::Result<()> {
    let cache = Cache::new(backend.clone());

    // Round trips through the store
    let key = cache.store("hello")?;
    println!("store(\"hello\") -> {key}");
    println!("get_str({key}) -> {:?}", cache.get_str(&key)?);

    let key = cache.store(42i64)?;
    println!("store(42) -> {key}");
    println!("get_int({key}) -> {:?}", cache.get_int(&key)?);

    // Counted + recorded store calls, then the replayed transcript
    let op = Counted::new(
        Recorded::new(StoreOp::new(cache.clone()), backend.clone()),
        backend.clone(),
    );
    op.call(&["foo".into()])?;
    op.call(&[97i64.into()])?;
    op.call(&[98i64.into()])?;
    print!("{}", transcript(backend.as_ref(), op.id())?);

    // Expiring page cache over a live fetcher
    let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout))?;
    let pages = PageCache::new(
        backend.clone(),
        fetcher,
        Duration::from_secs(config.page_ttl),
    );
    let url = "http://example.com/";
    let body = pages.get_page(url)?;
    println!("get_page({url}) -> {} bytes", body.len());
    let body = pages.get_page(url)?;
    println!("get_page({url}) -> {} bytes (cached)", body.len());
    println!("access_count({url}) -> {}", pages.access_count(url)?);

    Ok(())
}
