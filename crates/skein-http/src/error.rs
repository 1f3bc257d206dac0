//! HTTP error types and handling

use thiserror::Error;

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Generic reqwest error (client construction, request execution)
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Error raised by the middleware stack around a request
    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// I/O error while setting up or evicting the response cache
    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),
}

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

impl HttpError {
    /// Whether the error originated in the response cache rather than
    /// the transport.
    pub fn is_cache(&self) -> bool {
        matches!(self, HttpError::Cache(_))
    }
}
