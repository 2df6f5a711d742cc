use super::{ItemSource, SourceError};
use crate::model::RawItem;
use std::time::Duration;

/// Bounded exponential backoff: attempt `n` waits `base * 2^(n-1)` before
/// the next try, or longer when the server asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1u32 << exponent);
        match retry_after.map(Duration::from_secs) {
            Some(hint) if hint > backoff => hint,
            _ => backoff,
        }
    }
}

/// What earlier fetches learned. Threaded through calls by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub auth_failed: bool,
}

/// Fetch from `source`, retrying retryable failures under `policy`.
///
/// An authorization failure stops immediately and is remembered in the
/// returned state; passing that state back in skips the source entirely.
/// `sleep` performs the wait between attempts.
pub fn fetch_with_retry<S, F>(
    source: &mut S,
    policy: &RetryPolicy,
    mut state: RetryState,
    mut sleep: F,
) -> (Result<Vec<RawItem>, SourceError>, RetryState)
where
    S: ItemSource + ?Sized,
    F: FnMut(Duration),
{
    if state.auth_failed {
        tracing::warn!(source = %source.describe(), "Skipping fetch after earlier authorization failure");
        return (Err(SourceError::Unauthorized), state);
    }

    let mut attempt = 0;
    loop {
        attempt += 1;
        state.attempts += 1;

        let error = match source.fetch() {
            Ok(items) => {
                tracing::debug!(source = %source.describe(), attempt, count = items.len(), "Fetched items");
                return (Ok(items), state);
            }
            Err(error) => error,
        };

        if matches!(error, SourceError::Unauthorized) {
            tracing::error!(source = %source.describe(), "Authorization failed");
            state.auth_failed = true;
            return (Err(error), state);
        }

        if !error.is_retryable() || attempt >= policy.max_attempts {
            tracing::error!(source = %source.describe(), attempt, error = %error, "Fetch failed");
            return (Err(error), state);
        }

        let delay = policy.delay_for_attempt(attempt, error.retry_after());
        tracing::warn!(
            source = %source.describe(),
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Fetch failed, retrying"
        );
        sleep(delay);
    }
}
