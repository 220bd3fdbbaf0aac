use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::features::rate_limits::dtos::RateLimitDecision;
use crate::features::rate_limits::models::RateLimitRecord;

/// Fixed-window request counter keyed by client identifier
pub struct RateLimiter {
    records: DashMap<String, RateLimitRecord>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            records: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count a request from `client_key` at the current time
    pub fn check(&self, client_key: &str) -> RateLimitDecision {
        self.check_at(client_key, Utc::now())
    }

    /// Count a request from `client_key` at `now`.
    ///
    /// A fresh window starts when no record exists or the stored one has
    /// expired. Denied requests leave the count untouched.
    pub fn check_at(&self, client_key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        match self.records.entry(client_key.to_string()) {
            Entry::Occupied(mut occupied) if !occupied.get().is_expired(now) => {
                let record = occupied.get_mut();
                if record.count >= self.max_requests {
                    return RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        limit: self.max_requests,
                        reset_at: record.window_reset_at,
                    };
                }

                record.count += 1;
                RateLimitDecision {
                    allowed: true,
                    remaining: self.max_requests - record.count,
                    limit: self.max_requests,
                    reset_at: record.window_reset_at,
                }
            }
            entry => {
                let record = RateLimitRecord {
                    count: 1,
                    window_reset_at: now + self.window,
                };
                entry.insert(record);
                RateLimitDecision {
                    allowed: true,
                    remaining: self.max_requests.saturating_sub(1),
                    limit: self.max_requests,
                    reset_at: record.window_reset_at,
                }
            }
        }
    }

    /// Remove records whose window has ended, returning how many were dropped
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before.saturating_sub(self.records.len())
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }

    /// Spawn a background task sweeping expired records every `interval`
    pub fn spawn_sweeper(self: Arc<Self>, interval: StdDuration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.sweep_expired(Utc::now());
                if removed > 0 {
                    tracing::debug!(
                        "Rate limiter sweep removed {} expired records ({} remaining)",
                        removed,
                        self.tracked_clients()
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::new(3, Duration::seconds(60))
    }

    #[test]
    fn test_first_request_opens_window() {
        let limiter = limiter();
        let now = Utc::now();

        let decision = limiter.check_at("10.0.0.1", now);

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.limit, 3);
        assert_eq!(decision.reset_at, now + Duration::seconds(60));
    }

    #[test]
    fn test_request_over_limit_is_denied_with_retry_after() {
        let limiter = limiter();
        let start = Utc::now();

        for i in 0..3 {
            let decision = limiter.check_at("10.0.0.1", start + Duration::seconds(i));
            assert!(decision.allowed, "request {} should be allowed", i + 1);
            assert_eq!(decision.remaining, 2 - i as u32);
        }

        let now = start + Duration::seconds(20);
        let denied = limiter.check_at("10.0.0.1", now);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_secs(now), 40);
    }

    #[test]
    fn test_denied_requests_do_not_extend_count_or_window() {
        let limiter = limiter();
        let start = Utc::now();

        for _ in 0..10 {
            limiter.check_at("10.0.0.1", start);
        }

        let record = *limiter.records.get("10.0.0.1").unwrap();
        assert_eq!(record.count, 3);
        assert_eq!(record.window_reset_at, start + Duration::seconds(60));
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let limiter = limiter();
        let start = Utc::now();

        for _ in 0..4 {
            limiter.check_at("10.0.0.1", start);
        }

        let later = start + Duration::seconds(60);
        let decision = limiter.check_at("10.0.0.1", later);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.reset_at, later + Duration::seconds(60));
        assert_eq!(limiter.records.get("10.0.0.1").unwrap().count, 1);
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..3 {
            limiter.check_at("10.0.0.1", now);
        }

        assert!(!limiter.check_at("10.0.0.1", now).allowed);
        assert!(limiter.check_at("10.0.0.2", now).allowed);
    }

    #[test]
    fn test_sweep_removes_only_expired_records() {
        let limiter = limiter();
        let start = Utc::now();

        limiter.check_at("old", start);
        limiter.check_at("fresh", start + Duration::seconds(30));

        let removed = limiter.sweep_expired(start + Duration::seconds(61));

        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.records.contains_key("fresh"));
    }
}
