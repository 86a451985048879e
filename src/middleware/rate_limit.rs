//! Rate limiting middleware
//!
//! Per-user request limiting so a single chat cannot flood the backend.
//! Each Telegram user gets a token bucket refilled at the configured rate.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};

use crate::config::RateLimitSettings;
use crate::utils::errors::{EventHubError, Result};

/// Rate limiting middleware
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Option<Arc<DefaultKeyedRateLimiter<i64>>>,
    admin_exempt: bool,
    admin_ids: Vec<i64>,
}

impl RateLimitMiddleware {
    pub fn new(settings: &RateLimitSettings, admin_ids: Vec<i64>) -> Self {
        let limiter = if settings.enabled {
            let per_minute = NonZeroU32::new(settings.requests_per_minute).unwrap_or(NonZeroU32::MIN);
            let burst = NonZeroU32::new(settings.burst).unwrap_or(NonZeroU32::MIN);
            let quota = Quota::per_minute(per_minute).allow_burst(burst);
            Some(Arc::new(RateLimiter::keyed(quota)))
        } else {
            None
        };

        Self {
            limiter,
            admin_exempt: settings.admin_exempt,
            admin_ids,
        }
    }

    /// Check if user is rate limited
    pub fn check_rate_limit(&self, user_id: i64) -> Result<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        if self.admin_exempt && self.admin_ids.contains(&user_id) {
            debug!(user_id = user_id, "Admin user exempt from rate limiting");
            return Ok(());
        }

        match limiter.check_key(&user_id) {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!(user_id = user_id, "Rate limit exceeded");
                Err(EventHubError::RateLimitExceeded)
            }
        }
    }

    /// Drop buckets that have fully refilled
    pub fn cleanup(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
            debug!(tracked_users = limiter.len(), "Rate limiter cleaned up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn settings(burst: u32) -> RateLimitSettings {
        RateLimitSettings {
            enabled: true,
            requests_per_minute: 1,
            burst,
            admin_exempt: true,
        }
    }

    #[test]
    fn burst_is_allowed_then_limited() {
        let middleware = RateLimitMiddleware::new(&settings(3), vec![]);
        for _ in 0..3 {
            assert!(middleware.check_rate_limit(1).is_ok());
        }
        assert_matches!(middleware.check_rate_limit(1), Err(EventHubError::RateLimitExceeded));
    }

    #[test]
    fn users_are_limited_independently() {
        let middleware = RateLimitMiddleware::new(&settings(1), vec![]);
        assert!(middleware.check_rate_limit(1).is_ok());
        assert!(middleware.check_rate_limit(1).is_err());
        assert!(middleware.check_rate_limit(2).is_ok());
    }

    #[test]
    fn admins_are_exempt() {
        let middleware = RateLimitMiddleware::new(&settings(1), vec![99]);
        for _ in 0..10 {
            assert!(middleware.check_rate_limit(99).is_ok());
        }
    }

    #[test]
    fn disabled_limiter_allows_everything() {
        let mut disabled = settings(1);
        disabled.enabled = false;
        let middleware = RateLimitMiddleware::new(&disabled, vec![]);
        for _ in 0..10 {
            assert!(middleware.check_rate_limit(5).is_ok());
        }
    }
}
