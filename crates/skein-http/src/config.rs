//! HTTP client and response cache configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the cache subdirectory created under the caller-supplied root.
pub const CACHE_DIR_NAME: &str = "http-cache";

/// Default response cache size budget (10 MiB).
pub const DEFAULT_CACHE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration for the shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total request timeout (also bounds the request write phase)
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Read timeout (time between response bytes)
    pub read_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Idle connection timeout
    pub pool_idle_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Response cache settings; `None` disables caching entirely
    pub cache: Option<CacheConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            follow_redirects: true,
            max_redirects: 10,
            user_agent: format!("skein-http/{}", env!("CARGO_PKG_VERSION")),
            cache: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set max idle connections per host
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set idle connection timeout
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set whether to follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set maximum redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable the response cache
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Configuration for the disk-backed response cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding the cache's private files
    pub dir: PathBuf,

    /// Size budget in bytes for the on-disk contents
    pub max_size_bytes: u64,
}

impl CacheConfig {
    /// Create a cache config rooted at the given directory.
    ///
    /// The cache's private files live in a `http-cache` subdirectory of
    /// `root`, with the default 10 MiB size budget.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(CACHE_DIR_NAME),
            max_size_bytes: DEFAULT_CACHE_SIZE_BYTES,
        }
    }

    /// Set the size budget in bytes
    pub fn max_size_bytes(mut self, max: u64) -> Self {
        self.max_size_bytes = max;
        self
    }
}
