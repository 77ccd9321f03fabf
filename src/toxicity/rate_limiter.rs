// Minimum-interval rate limiter for metered scoring APIs.
//
// Requests are spaced at least `interval` apart. Each caller reserves the
// next free slot under the lock, then sleeps until it outside the lock, so
// concurrent callers are granted one interval after another.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Shared limiter; clones pace the same stream of requests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<Pacing>>,
}

struct Pacing {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Allow at most `requests_per_second` requests per second.
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Pacing {
                interval: Duration::from_secs_f64(1.0 / requests_per_second),
                last_request: None,
            })),
        }
    }

    /// Wait until the next request may go out.
    pub async fn acquire(&self) {
        let slot = {
            let mut pacing = self.inner.lock().await;
            let now = Instant::now();
            let slot = match pacing.last_request {
                Some(last) => (last + pacing.interval).max(now),
                None => now,
            };
            pacing.last_request = Some(slot);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
