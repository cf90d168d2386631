// ABOUTME: Capped exponential backoff after repeated poll failures

use std::time::Duration;

use crate::config::BackoffConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    threshold: u32,
    base: Duration,
    max: Duration,
}

impl BackoffPolicy {
    pub fn new(threshold: u32, base: Duration, max: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            base,
            max: max.max(base),
        }
    }

    /// Delay before the next poll after `failures` consecutive failures.
    ///
    /// `None` below the threshold; from there it doubles per failure up to
    /// the cap.
    pub fn delay(&self, failures: u32) -> Option<Duration> {
        if failures < self.threshold {
            return None;
        }
        let exponent = (failures - self.threshold).min(16);
        let delay = self.base.saturating_mul(1u32 << exponent);
        Some(delay.min(self.max))
    }
}

impl From<BackoffConfig> for BackoffPolicy {
    fn from(config: BackoffConfig) -> Self {
        Self::new(
            config.threshold,
            Duration::from_millis(config.base_ms),
            Duration::from_millis(config.max_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_delay_below_threshold() {
        let policy = BackoffPolicy::new(3, Duration::from_secs(5), Duration::from_secs(60));
        assert_eq!(policy.delay(0), None);
        assert_eq!(policy.delay(2), None);
    }

    #[test]
    fn doubles_until_capped() {
        let policy = BackoffPolicy::from(BackoffConfig {
            threshold: 3,
            base_ms: 5000,
            max_ms: 30_000,
        });
        assert_eq!(policy.delay(3), Some(Duration::from_secs(5)));
        assert_eq!(policy.delay(4), Some(Duration::from_secs(10)));
        assert_eq!(policy.delay(5), Some(Duration::from_secs(20)));
        assert_eq!(policy.delay(6), Some(Duration::from_secs(30)));
        assert_eq!(policy.delay(500), Some(Duration::from_secs(30)));
    }
}
