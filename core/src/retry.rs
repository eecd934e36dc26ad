//! Fixed-delay retry for a backend that answers 503 while it cold-starts.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1200);

/// Waits between attempts. Injected so tests can count delays without sleeping.
pub trait Sleep {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Bounded retry policy applied to read operations.
///
/// Failures with a status other than 503 propagate at once, as do bodies
/// that fail to decode. A 503, or a transport failure, is retried after `delay` until `max_attempts`
/// calls have been made. The delay is constant between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Whether attempt number `attempt` (1-based) may be followed by another.
    pub fn should_retry(&self, err: &ApiError, attempt: u32) -> bool {
        attempt < self.max_attempts && err.is_transient()
    }

    /// Run `op` until it succeeds, fails permanently, or runs out of attempts.
    /// `op` is always called at least once.
    pub fn run<T, F>(&self, sleeper: &dyn Sleep, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Result<T, ApiError>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if self.should_retry(&err, attempt) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay = ?self.delay,
                        "backend unavailable, retrying: {err}"
                    );
                    sleeper.sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
