//! Per-client sliding-window rate limiting.
//!
//! Clients are told apart by peer IP when the server is run with connect
//! info (see [`crate::start`]). Without it, such as when a router is driven
//! directly in tests, the bearer token is the key and anonymous callers share
//! a single bucket.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::api_v1::error_body;

/// Idle clients are swept once this many are tracked.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ClientKey {
    Addr(IpAddr),
    Token(String),
    Anonymous,
}

impl ClientKey {
    pub(crate) fn of(req: &Request) -> Self {
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Self::Addr(addr.ip());
        }
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| Self::Token(v.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addr(ip) => write!(f, "{ip}"),
            // Never log credentials.
            Self::Token(_) => f.write_str("bearer"),
            Self::Anonymous => f.write_str("anonymous"),
        }
    }
}

pub(crate) struct RateLimiter {
    limit: usize,
    window: Duration,
    hits: Mutex<HashMap<ClientKey, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub(crate) fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Record one request from `client` at `now`.
    ///
    /// Over the limit, nothing is recorded and the error carries the time
    /// until the client's oldest request leaves the window.
    pub(crate) fn acquire(&self, client: &ClientKey, now: Instant) -> Result<(), Duration> {
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        if hits.len() >= SWEEP_THRESHOLD && !hits.contains_key(client) {
            hits.retain(|_, times| {
                times
                    .back()
                    .is_some_and(|t| now.saturating_duration_since(*t) < self.window)
            });
        }

        let times = hits.entry(client.clone()).or_default();
        while times
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.window)
        {
            times.pop_front();
        }

        if times.len() >= self.limit {
            let oldest = times.front().copied().unwrap_or(now);
            return Err(self.window.saturating_sub(now.saturating_duration_since(oldest)));
        }

        times.push_back(now);
        Ok(())
    }
}

/// Rejects over-limit clients with 429 and a `Retry-After` header.
/// `/health` is exempt.
pub(crate) async fn rate_limit_middleware(
    limiter: Arc<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if req.uri().path() == "/health" {
        return next.run(req).await;
    }

    let client = ClientKey::of(&req);
    match limiter.acquire(&client, Instant::now()) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let retry_after = (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1);
            warn!(%client, retry_after, "Rate limit exceeded");
            (
                [(header::RETRY_AFTER, retry_after.to_string())],
                error_body(
                    StatusCode::TOO_MANY_REQUESTS,
                    "Rate limit exceeded",
                    Some(format!("retry in {retry_after}s")),
                ),
            )
                .into_response()
        }
    }
}
