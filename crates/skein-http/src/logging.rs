//! Request/response timing middleware
//!
//! A pass-through observer around each wire exchange: one TRACE line
//! when the request goes out, one with the elapsed time when the
//! response comes back. Transport errors flow through untouched.

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::time::{Duration, Instant};
use tracing::trace;

/// Logs each request URL and the time the exchange took.
///
/// Registered innermost in the middleware stack, so a response served
/// from the cache produces no lines and the measured duration covers
/// exactly one network exchange.
pub struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let url = req.url().clone();
        let start = Instant::now();
        trace!("sending request {}", url);

        let result = next.run(req, extensions).await;

        if let Ok(response) = &result {
            trace!(
                "received response for {} in {:.1}ms",
                response.url(),
                elapsed_millis(start.elapsed())
            );
        }

        result
    }
}

/// Elapsed time in milliseconds with sub-millisecond precision
fn elapsed_millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
