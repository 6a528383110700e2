use std::time::Duration;

/// Exponential backoff for block retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry `attempt` (1-based): `base * 2^attempt`. `None` once
    /// the budget is spent or the delay would overflow.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        let factor = 2u32.checked_pow(attempt)?;
        self.base.checked_mul(factor)
    }

    /// Sum of every delay the policy can produce.
    pub fn total_backoff(&self) -> Duration {
        (1..=self.max_retries)
            .map_while(|attempt| self.delay_for(attempt))
            .sum()
    }
}
