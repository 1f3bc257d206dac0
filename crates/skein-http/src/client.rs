//! Shared HTTP client handle

use crate::cache::{clear_quietly, CacheStore};
use crate::config::HttpClientConfig;
use crate::error::HttpResult;
use crate::logging::LoggingMiddleware;
use reqwest::Method;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use std::sync::Arc;
use tracing::debug;

/// The shared HTTP client: fixed timeouts, disk-backed response cache,
/// request timing logs.
///
/// Cheap to clone; clones share the same underlying client, connection
/// pool, and cache. Most applications build exactly one of these (via
/// [`ClientProvider`](crate::provider::ClientProvider)) and use it
/// everywhere; two caches on the same directory would stomp on each
/// other's files.
///
/// # Example
///
/// ```ignore
/// use skein_http::{CacheConfig, HttpClient, HttpClientConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = HttpClientConfig::new().cache(CacheConfig::new("/tmp/app-cache"));
///     let client = HttpClient::new(config)?;
///
///     let response = client.get("https://api.example.com/feed").await?;
///     println!("Status: {}", response.status());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: ClientWithMiddleware,
    config: HttpClientConfig,
    cache: Option<CacheStore>,
}

impl HttpClient {
    /// Create a new client with the given configuration.
    ///
    /// A cache that cannot be set up (unwritable directory, I/O error)
    /// is logged at debug level and skipped; the client is still
    /// returned and works uncached.
    pub fn new(config: HttpClientConfig) -> HttpResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent);

        if config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let mut middleware = ClientBuilder::new(builder.build()?);

        let cache = match &config.cache {
            Some(cache_config) => match CacheStore::attach(cache_config) {
                Ok(store) => {
                    middleware = middleware.with(store.middleware());
                    Some(store)
                }
                Err(e) => {
                    debug!("unable to set up http cache: {}", e);
                    None
                }
            },
            None => None,
        };

        // The timer goes after the cache so cache hits never reach it
        // and the measured duration covers a single wire exchange.
        let client = middleware.with(LoggingMiddleware).build();

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                config,
                cache,
            }),
        })
    }

    /// The underlying middleware-wrapped client, for arbitrary requests
    pub fn client(&self) -> &ClientWithMiddleware {
        &self.inner.client
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// The attached response cache, if setup succeeded
    pub fn cache(&self) -> Option<&CacheStore> {
        self.inner.cache.as_ref()
    }

    /// Evict all entries from the response cache.
    ///
    /// No-op without an attached cache; I/O errors are logged and never
    /// surfaced.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            clear_quietly(cache).await;
        }
    }

    // Convenience methods for common HTTP methods

    /// Send a GET request
    pub async fn get(&self, url: &str) -> HttpResult<reqwest::Response> {
        Ok(self.inner.client.get(url).send().await?)
    }

    /// Send a HEAD request
    pub async fn head(&self, url: &str) -> HttpResult<reqwest::Response> {
        Ok(self.inner.client.head(url).send().await?)
    }

    /// Send a POST request with JSON body
    pub async fn post(&self, url: &str, body: serde_json::Value) -> HttpResult<reqwest::Response> {
        Ok(self.inner.client.post(url).json(&body).send().await?)
    }

    /// Create a request builder for more complex requests
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner.client.request(method, url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.inner.config.timeout)
            .field("cache", &self.inner.cache.as_ref().map(|c| c.path()))
            .finish()
    }
}
