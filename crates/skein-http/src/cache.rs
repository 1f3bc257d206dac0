//! Disk-backed response cache handle
//!
//! The cache's storage format and per-entry eviction are owned by the
//! `http-cache-reqwest` manager; this module only manages the directory
//! it lives in: creation, the size budget, and evict-all.

use crate::config::CacheConfig;
use crate::error::HttpResult;
use http_cache_reqwest::{CACacheManager, Cache, CacheMode, HttpCache, HttpCacheOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Handle to the on-disk response cache.
///
/// Cheap to clone; clones refer to the same directory. It is an error
/// to have two caches on the same directory inside one process, which
/// is why this handle is only created through the shared client.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    max_size_bytes: u64,
}

impl CacheStore {
    /// Create the cache directory and return a store for it.
    ///
    /// Creating the directory doubles as the writability probe: an
    /// unwritable root fails here, before the cache is ever wired into
    /// a client. Pre-existing contents over the size budget are wiped.
    pub fn attach(config: &CacheConfig) -> HttpResult<Self> {
        std::fs::create_dir_all(&config.dir)?;

        let store = Self {
            path: config.dir.clone(),
            max_size_bytes: config.max_size_bytes,
        };
        store.enforce_budget()?;
        Ok(store)
    }

    /// Directory holding the cache's private files
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size budget in bytes
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Total bytes currently stored under the cache directory
    pub fn disk_usage(&self) -> u64 {
        WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.metadata().ok())
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
            .sum()
    }

    /// Response-caching middleware backed by this store
    pub fn middleware(&self) -> Cache<CACacheManager> {
        Cache(HttpCache {
            mode: CacheMode::Default,
            manager: CACacheManager {
                path: self.path.clone(),
            },
            options: HttpCacheOptions::default(),
        })
    }

    /// Evict all cached entries.
    ///
    /// Removes the directory contents and recreates the directory; the
    /// store, the client, and live connections are untouched.
    pub async fn clear(&self) -> std::io::Result<()> {
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        tokio::fs::create_dir_all(&self.path).await
    }

    /// Wipe the directory if its pre-existing contents exceed the
    /// budget. Entry-level eviction during operation is the cache
    /// manager's concern; this only bounds carry-over between runs.
    fn enforce_budget(&self) -> std::io::Result<()> {
        let usage = self.disk_usage();
        if usage > self.max_size_bytes {
            debug!(
                "http cache at {} over budget ({} > {} bytes), wiping",
                self.path.display(),
                usage,
                self.max_size_bytes
            );
            std::fs::remove_dir_all(&self.path)?;
            std::fs::create_dir_all(&self.path)?;
        }
        Ok(())
    }
}

/// Evict all entries, logging failures instead of surfacing them.
///
/// Cache maintenance must never become the caller's problem, so I/O
/// errors end up in the log at error level and the call returns
/// normally.
pub(crate) async fn clear_quietly(store: &CacheStore) {
    if let Err(e) = store.clear().await {
        error!(
            "failed to evict http cache at {}: {}",
            store.path().display(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(root.path());
        let store = CacheStore::attach(&config).unwrap();

        assert!(store.path().is_dir());
        assert_eq!(store.path(), root.path().join("http-cache"));
        assert_eq!(store.max_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_attach_fails_when_root_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let config = CacheConfig::new(&file);
        assert!(CacheStore::attach(&config).is_err());
    }

    #[test]
    fn test_attach_wipes_oversized_contents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("http-cache");
        std::fs::create_dir_all(&dir).unwrap();
        let stale = dir.join("stale-entry");
        std::fs::write(&stale, vec![0u8; 2048]).unwrap();

        let config = CacheConfig::new(root.path()).max_size_bytes(1024);
        let store = CacheStore::attach(&config).unwrap();

        assert!(!stale.exists());
        assert!(store.path().is_dir());
        assert_eq!(store.disk_usage(), 0);
    }

    #[test]
    fn test_attach_keeps_contents_within_budget() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("http-cache");
        std::fs::create_dir_all(&dir).unwrap();
        let entry = dir.join("entry");
        std::fs::write(&entry, vec![0u8; 512]).unwrap();

        let config = CacheConfig::new(root.path()).max_size_bytes(1024);
        let store = CacheStore::attach(&config).unwrap();

        assert!(entry.exists());
        assert_eq!(store.disk_usage(), 512);
    }

    #[tokio::test]
    async fn test_clear_removes_entries_and_keeps_directory() {
        let root = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(root.path());
        let store = CacheStore::attach(&config).unwrap();
        std::fs::write(store.path().join("entry"), b"payload").unwrap();

        store.clear().await.unwrap();

        assert!(store.path().is_dir());
        assert_eq!(store.disk_usage(), 0);
    }

    #[tokio::test]
    async fn test_clear_on_missing_directory_is_ok() {
        let root = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(root.path());
        let store = CacheStore::attach(&config).unwrap();

        std::fs::remove_dir_all(store.path()).unwrap();
        store.clear().await.unwrap();
        assert!(store.path().is_dir());
    }
}
