use std::time::Duration;

use tokio::time::Instant;

use super::errors::ShellError;

/// Timestamp gate on submitted lines: a line arriving sooner than
/// `min_interval` after the last accepted one is rejected.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval, last: None }
    }

    /// Accept the current instant, or fail without touching the gate.
    pub fn check(&mut self) -> Result<(), ShellError> {
        let now = Instant::now();
        if let Some(last) = self.last {
            if now.duration_since(last) < self.min_interval {
                return Err(ShellError::RateLimited);
            }
        }
        self.last = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rejects_until_interval_passes() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        assert!(limiter.check().is_ok());
        assert_eq!(limiter.check(), Err(ShellError::RateLimited));

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(limiter.check().is_err());
        // the rejected attempts did not move the gate
        tokio::time::advance(Duration::from_millis(40)).await;
        assert!(limiter.check().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_limits() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        for _ in 0..5 {
            assert!(limiter.check().is_ok());
        }
    }
}
