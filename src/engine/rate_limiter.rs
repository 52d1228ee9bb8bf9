//! Request rate limiting.
//!
//! Token bucket limiting of probe starts per second, shared by every probe in
//! a scan.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = GovLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A cloneable handle to a shared token bucket.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Limit to `rate` probe starts per second. Returns `None` for 0, which
    /// callers treat as unlimited.
    pub fn per_second(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        Some(Self {
            limiter: Arc::new(GovLimiter::direct(Quota::per_second(rate))),
        })
    }

    /// Wait until a token is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_is_unlimited() {
        assert!(RateLimiter::per_second(0).is_none());
    }

    #[test]
    fn test_bucket_is_shared_between_clones() {
        let limiter = RateLimiter::per_second(1).unwrap();
        let clone = limiter.clone();
        assert!(limiter.limiter.check().is_ok());
        assert!(clone.limiter.check().is_err());
    }

    #[tokio::test]
    async fn test_wait_with_high_rate() {
        let limiter = RateLimiter::per_second(1000).unwrap();
        limiter.wait().await;
    }
}
