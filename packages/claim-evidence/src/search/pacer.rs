//! Process-wide pacing of literature-backend requests.

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::sync::Arc;
use std::time::Duration;

use crate::types::config::SearchConfig;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Enforces a minimum interval between consecutive backend requests.
///
/// Clones share one limiter, so every search client built from the same
/// pacer (or its clones) draws from a single budget no matter how many
/// items are in flight.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Arc<DirectRateLimiter>,
    interval: Duration,
}

impl RequestPacer {
    /// Pacer allowing one request per `interval`, with no burst.
    ///
    /// A zero interval falls back to the backend's published limit of
    /// 3 requests/second.
    pub fn new(interval: Duration) -> Self {
        let quota =
            Quota::with_period(interval).unwrap_or_else(|| Quota::per_second(nonzero!(3u32)));
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            interval,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.min_request_interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may be sent.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("interval", &self.interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_clones_share_budget() {
        let pacer = RequestPacer::new(Duration::from_millis(150));
        let other = pacer.clone();

        let start = Instant::now();
        pacer.wait().await;
        other.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(
            RequestPacer::default().interval(),
            Duration::from_millis(350)
        );
    }
}
