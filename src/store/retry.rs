use std::fmt::Display;
use std::time::Duration;

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Run `op` until it succeeds or the attempts are used up; the last
    /// error is returned. At least one attempt is always made.
    pub async fn run<T, E, F>(&self, what: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    log::warn!(
                        "{} attempt {}/{} failed: {}, retrying in {:?}",
                        what,
                        attempt,
                        attempts,
                        e,
                        self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::error!("{} failed after {} attempts: {}", what, attempts, e);
                    return Err(e);
                }
            }
        }
    }
}
