//! The token-bucket rate limiter (spec §4.4 "Rate limiter (token bucket)"),
//! guarding `/api/isearch` only. Delays rather than rejects: an exhausted
//! bucket sleeps for one refill period instead of returning an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// One shared bucket of `capacity == rate` tokens/second.
#[derive(Clone)]
pub struct RateLimiter {
    rate: f64,
    capacity: f64,
    bucket: Arc<Mutex<Bucket>>,
}

impl RateLimiter {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            capacity: rate,
            bucket: Arc::new(Mutex::new(Bucket { tokens: rate, last_refill: Instant::now() })),
        }
    }

    /// Blocks the caller until a token is available, following the exact
    /// refill-then-decide algorithm of spec §4.4: refill under the lock by
    /// the floored number of elapsed periods, and if still empty, sleep for
    /// `1/rate` seconds before proceeding without a further decrement. The
    /// lock is held across the sleep, so a second caller cannot even refill
    /// the bucket until the first caller's wait completes — serializing
    /// rate-limited requests in lock-acquisition order.
    async fn acquire(&self) {
        let mut bucket = self.bucket.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        let delta = (elapsed * self.rate).floor();
        bucket.tokens = (bucket.tokens + delta).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
        } else {
            tokio::time::sleep(Duration::from_secs_f64(1.0 / self.rate)).await;
            bucket.last_refill = Instant::now();
        }
    }
}

pub async fn enforce(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    limiter.acquire().await;
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_burst_up_to_capacity_does_not_wait() {
        let limiter = RateLimiter::new(10.0);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn exhausted_bucket_delays_roughly_one_refill_period() {
        let limiter = RateLimiter::new(10.0);
        for _ in 0..10 {
            limiter.acquire().await;
        }
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }
}
