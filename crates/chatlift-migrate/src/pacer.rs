//! Fixed-delay pacing between platform requests.

use std::time::Duration;

/// Inserts a fixed delay after each unit of work (conversation, user) to
/// respect destination-side rate limits. No adaptive backoff, no retries;
/// a future policy replaces this collaborator without touching the
/// orchestration.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Sleeps for the configured delay; a zero delay returns immediately.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
