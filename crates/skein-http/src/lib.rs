//! skein-http: shared HTTP client provider
//!
//! One process-wide HTTP client, created lazily with fixed timeouts, a
//! disk-backed response cache, and per-request timing logs. The
//! transport, connection pooling, and cache storage format are
//! delegated to reqwest and its middleware ecosystem; this crate is the
//! glue that configures them once and hands out the shared handle.
//!
//! # Architecture
//!
//! - `ClientProvider`: lazy, race-free singleton with explicit reset
//! - `HttpClient`: the shared handle (timeouts, cache, logging)
//! - `CacheStore`: disk cache directory management and evict-all
//! - `LoggingMiddleware`: pass-through request/response timing observer

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;

pub use cache::CacheStore;
pub use client::HttpClient;
pub use config::{CacheConfig, HttpClientConfig, CACHE_DIR_NAME, DEFAULT_CACHE_SIZE_BYTES};
pub use error::{HttpError, HttpResult};
pub use logging::LoggingMiddleware;
pub use provider::{clear_shared_cache, reset_shared, shared_client, ClientProvider};
