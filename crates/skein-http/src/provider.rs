//! Lazy, race-free provider for the shared client
//!
//! One provider owns at most one [`HttpClient`]; the first `get` builds
//! it and later calls hand out the same handle. A process-global
//! provider is available for applications that want a single ambient
//! client without threading one through.

use crate::cache::clear_quietly;
use crate::client::HttpClient;
use crate::config::{CacheConfig, HttpClientConfig};
use crate::error::HttpResult;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::path::Path;

/// Lazily constructs and memoizes a single [`HttpClient`].
///
/// First construction is serialized under a mutex, so concurrent first
/// calls still produce exactly one handle. [`reset`](Self::reset)
/// drops the handle; the next `get` rebuilds from scratch.
pub struct ClientProvider {
    handle: Mutex<Option<HttpClient>>,
}

impl ClientProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the shared client, building it on first use.
    ///
    /// The first call constructs a client with default settings and a
    /// response cache rooted at `cache_root`. Later calls return the
    /// existing handle unchanged and ignore the argument.
    pub fn get(&self, cache_root: impl AsRef<Path>) -> HttpResult<HttpClient> {
        self.get_with_config(HttpClientConfig::default().cache(CacheConfig::new(cache_root)))
    }

    /// Get the shared client, building it from `config` on first use.
    pub fn get_with_config(&self, config: HttpClientConfig) -> HttpResult<HttpClient> {
        let mut guard = self.handle.lock();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = HttpClient::new(config)?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Evict all entries from the shared client's response cache.
    ///
    /// No-op when no client has been built yet or when cache setup
    /// failed; eviction I/O errors are logged and never surfaced.
    pub async fn clear_cache(&self) {
        // Snapshot under the lock, do the I/O outside it.
        let cache = {
            let guard = self.handle.lock();
            guard.as_ref().and_then(|client| client.cache().cloned())
        };

        if let Some(cache) = cache {
            clear_quietly(&cache).await;
        }
    }

    /// Drop the current handle so the next `get` rebuilds.
    ///
    /// Existing clones of the handle keep working; only the provider's
    /// memoized reference is released.
    pub fn reset(&self) {
        *self.handle.lock() = None;
    }

    /// Whether a client has been built
    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }
}

impl Default for ClientProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-global provider behind the `shared_*` functions
static SHARED_PROVIDER: Lazy<ClientProvider> = Lazy::new(ClientProvider::new);

/// Get the process-wide shared client, building it on first use.
///
/// See [`ClientProvider::get`] for the lifecycle; prefer owning a
/// provider and passing the handle explicitly where practical.
pub fn shared_client(cache_root: impl AsRef<Path>) -> HttpResult<HttpClient> {
    SHARED_PROVIDER.get(cache_root)
}

/// Evict all entries from the process-wide client's response cache
pub async fn clear_shared_cache() {
    SHARED_PROVIDER.clear_cache().await;
}

/// Drop the process-wide client so the next [`shared_client`] rebuilds
pub fn reset_shared() {
    SHARED_PROVIDER.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_get_returns_the_same_handle() {
        let root = tempfile::tempdir().unwrap();
        let provider = ClientProvider::new();

        let first = provider.get(root.path()).unwrap();
        let second = provider.get(root.path()).unwrap();

        assert!(std::ptr::eq(first.client(), second.client()));
        assert_eq!(first.config().timeout, Duration::from_secs(30));
        assert_eq!(second.config().connect_timeout, Duration::from_secs(30));
        assert_eq!(second.config().read_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_second_root_is_ignored() {
        let root_a = tempfile::tempdir().unwrap();
        let root_b = tempfile::tempdir().unwrap();
        let provider = ClientProvider::new();

        let first = provider.get(root_a.path()).unwrap();
        let second = provider.get(root_b.path()).unwrap();

        assert!(std::ptr::eq(first.client(), second.client()));
        assert!(root_a.path().join("http-cache").is_dir());
        assert!(!root_b.path().join("http-cache").exists());
    }

    #[test]
    fn test_reset_rebuilds_on_next_get() {
        let root = tempfile::tempdir().unwrap();
        let provider = ClientProvider::new();

        let first = provider.get(root.path()).unwrap();
        provider.reset();
        assert!(!provider.is_initialized());

        let second = provider.get(root.path()).unwrap();
        assert!(!std::ptr::eq(first.client(), second.client()));
    }

    #[tokio::test]
    async fn test_clear_cache_before_get_is_noop() {
        let provider = ClientProvider::new();
        provider.clear_cache().await;
        assert!(!provider.is_initialized());
    }

    #[tokio::test]
    async fn test_clear_cache_empties_the_cache_directory() {
        let root = tempfile::tempdir().unwrap();
        let provider = ClientProvider::new();
        let client = provider.get(root.path()).unwrap();

        let cache = client.cache().expect("cache should attach");
        std::fs::write(cache.path().join("entry"), b"payload").unwrap();
        assert!(cache.disk_usage() > 0);

        provider.clear_cache().await;
        assert_eq!(cache.disk_usage(), 0);
        assert!(cache.path().is_dir());
    }

    #[test]
    fn test_concurrent_first_use_builds_one_handle() {
        let root = tempfile::tempdir().unwrap();
        let provider = std::sync::Arc::new(ClientProvider::new());

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                let path = root.path().to_path_buf();
                std::thread::spawn(move || provider.get(path).unwrap())
            })
            .collect();
        let handles: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();

        let first = &handles[0];
        for other in &handles[1..] {
            assert!(std::ptr::eq(first.client(), other.client()));
        }
    }
}
