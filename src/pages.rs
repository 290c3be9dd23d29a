//! Page Cache Module
//!
//! Caches fetched page bodies with a fixed TTL and counts access attempts
//! per URL.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::backend::{read_counter, Backend};
use crate::error::{CacheError, Result};

// == Fetch Trait ==
/// Retrieves the body of a resource.
///
/// Opaque to the cache: protocol, redirects, and timeouts are the
/// implementation's business. The call blocks for the duration of the
/// remote request.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// Blocking HTTP fetcher over reqwest.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Fetcher(format!("client setup: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| CacheError::Fetcher(format!("GET {url}: {e}")))?;

        response
            .text()
            .map_err(|e| CacheError::Fetcher(format!("GET {url}: {e}")))
    }
}

/// Key under which access attempts for `url` are counted.
fn count_key(url: &str) -> String {
    format!("count:{url}")
}

// == Page Cache ==
/// Expiring cache in front of a fetch collaborator.
///
/// Bodies live under the URL itself with a fixed TTL; forgetting an
/// expired body is entirely the backing store's mechanism. The access
/// counter ticks on every call, hit or miss, before the cache is even
/// consulted, so a call whose fetch fails still counts as an access
/// attempt.
pub struct PageCache<F> {
    backend: Arc<dyn Backend>,
    fetcher: F,
    ttl: Duration,
}

impl<F: Fetch> PageCache<F> {
    // == Constructor ==
    /// Creates a page cache storing bodies in `backend` for `ttl` per entry.
    pub fn new(backend: Arc<dyn Backend>, fetcher: F, ttl: Duration) -> Self {
        Self {
            backend,
            fetcher,
            ttl,
        }
    }

    // == Get Page ==
    /// Returns the body for `url`, fetching only on a cache miss.
    pub fn get_page(&self, url: &str) -> Result<String> {
        self.backend.incr(&count_key(url))?;

        if let Some(cached) = self.backend.get(url)? {
            debug!(url, "page cache hit");
            return String::from_utf8(cached).map_err(|e| CacheError::Decode {
                key: url.to_string(),
                reason: e.to_string(),
            });
        }

        debug!(url, "page cache miss, fetching");
        let body = self.fetcher.fetch(url)?;
        self.backend
            .set_ex(url, body.clone().into_bytes(), self.ttl)?;
        Ok(body)
    }

    // == Access Count ==
    /// Number of times `get_page` has been called for `url`, hits and
    /// misses alike. Zero when the URL was never requested.
    pub fn access_count(&self, url: &str) -> Result<i64> {
        read_counter(self.backend.as_ref(), &count_key(url))
    }
}
