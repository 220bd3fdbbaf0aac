use chrono::{DateTime, Utc};

/// Outcome of a single rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, rounded up and never below 1
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn decision(reset_at: DateTime<Utc>) -> RateLimitDecision {
        RateLimitDecision {
            allowed: false,
            remaining: 0,
            limit: 3,
            reset_at,
        }
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let now = Utc::now();
        assert_eq!(
            decision(now + Duration::milliseconds(40_200)).retry_after_secs(now),
            41
        );
        assert_eq!(decision(now + Duration::seconds(60)).retry_after_secs(now), 60);
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let now = Utc::now();
        assert_eq!(decision(now).retry_after_secs(now), 1);
        assert_eq!(
            decision(now - Duration::seconds(5)).retry_after_secs(now),
            1
        );
    }
}
