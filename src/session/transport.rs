//! Rate-limited retrying HTTP transport
//!
//! All outbound traffic for a session funnels through this module:
//! - every URL is validated against the domain allow-list first
//! - a minimum delay between requests is enforced via the context's
//!   request lock
//! - transient failures (timeout, connection error, 5xx) are retried up to
//!   the configured limit; everything else fails immediately
//! - the streaming variant trades the buffered body for a raw byte stream
//!   and a longer timeout

use crate::session::SessionContext;
use crate::url::validate_url;
use crate::{Result, ScrapeError};
use bytes::Bytes;
use futures::Stream;
use reqwest::header::HeaderMap;
use reqwest::{Method, Response, StatusCode};
use std::time::{Duration, Instant};
use url::Url;

/// Per-call overrides for the transport
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers merged over the client defaults
    pub headers: Option<HeaderMap>,

    /// Overrides the configured timeout for this call
    pub timeout: Option<Duration>,
}

/// A streaming response: status and headers up front, body on demand
pub struct StreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    response: Response,
}

impl StreamResponse {
    /// Consumes the response, yielding the raw byte stream
    pub fn bytes_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> {
        self.response.bytes_stream()
    }
}

/// Issues a GET request through the session's rate limiter
pub async fn request(ctx: &SessionContext, url: &str) -> Result<Response> {
    request_with(ctx, url, RequestOptions::default()).await
}

/// Issues a GET request with per-call overrides
pub async fn request_with(
    ctx: &SessionContext,
    url: &str,
    options: RequestOptions,
) -> Result<Response> {
    execute(ctx, Method::GET, url, None, options).await
}

/// Issues a URL-encoded form POST through the session's rate limiter
pub async fn post_form(
    ctx: &SessionContext,
    url: &str,
    fields: &[(&str, &str)],
    options: RequestOptions,
) -> Result<Response> {
    execute(ctx, Method::POST, url, Some(fields), options).await
}

/// Issues a GET request and exposes the body as a byte stream
///
/// Uses the stream timeout from the configuration unless overridden, since
/// audio downloads run much longer than page fetches.
pub async fn stream_request(
    ctx: &SessionContext,
    url: &str,
    mut options: RequestOptions,
) -> Result<StreamResponse> {
    if options.timeout.is_none() {
        options.timeout = Some(Duration::from_secs(ctx.config().stream_timeout_secs));
    }

    let response = execute(ctx, Method::GET, url, None, options).await?;

    Ok(StreamResponse {
        status: response.status(),
        headers: response.headers().clone(),
        response,
    })
}

/// Core send loop: validate, gate, send, classify, retry
async fn execute(
    ctx: &SessionContext,
    method: Method,
    url: &str,
    form: Option<&[(&str, &str)]>,
    options: RequestOptions,
) -> Result<Response> {
    let config = ctx.config();
    let target = validate_url(url, &config.allowed_domains)?;
    let retry_delay = Duration::from_millis(config.retry_delay_ms);

    let mut attempt: u32 = 0;

    loop {
        wait_for_slot(ctx).await;

        let client = ctx.client();
        let mut builder = client.request(method.clone(), target.clone());

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(headers) = &options.headers {
            builder = builder.headers(headers.clone());
        }
        if let Some(fields) = form {
            builder = builder.form(fields);
        }

        let error = match builder.send().await {
            Ok(response) if response.status().is_server_error() => ScrapeError::Http {
                url: target.to_string(),
                status: response.status().as_u16(),
            },
            // Non-5xx responses go back to the caller as-is; a 404 page is
            // the caller's problem to interpret, not a transport failure
            Ok(response) => return Ok(response),
            Err(e) => classify_send_error(&target, e),
        };

        if attempt >= config.max_retries || !error.is_retryable() {
            return Err(error);
        }

        attempt += 1;
        tracing::warn!(
            "Retrying {} in {:?} (attempt {}/{}): {}",
            target,
            retry_delay,
            attempt,
            config.max_retries,
            error
        );
        tokio::time::sleep(retry_delay).await;
    }
}

/// Maps a reqwest send error onto the transport error taxonomy
fn classify_send_error(url: &Url, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        ScrapeError::Connection {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Waits until the rate limiter allows another request, then stamps it
///
/// The state lock is held across the sleep: a second caller arriving during
/// the wait queues on the lock and computes its own wait from the updated
/// timestamp, so requests pass the gate strictly one at a time.
async fn wait_for_slot(ctx: &SessionContext) {
    let min_delay = Duration::from_millis(ctx.config().rate_limit_ms);
    let mut state = ctx.state().lock().await;

    if let Some(wait) = state.time_until_next_request(min_delay, Instant::now()) {
        tokio::time::sleep(wait).await;
    }

    state.record_request(Instant::now());
}
