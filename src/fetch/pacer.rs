// src/fetch/pacer.rs
// =============================================================================
// Polite crawling: after every `every` requests we stop for `pause` before
// sending the next one.
//
// The counter is global across every kind of fetch (pages, raw text used for
// the topic test, robots.txt), and it lives here instead of in a static so
// that each crawl owns its own count.
// =============================================================================

use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RequestPacer {
    every: usize,
    pause: Duration,
    issued: usize,
    pauses: usize,
}

impl RequestPacer {
    pub fn new(every: usize, pause: Duration) -> Self {
        Self {
            // every = 0 would pause before every request; treat it as 1
            every: every.max(1),
            pause,
            issued: 0,
            pauses: 0,
        }
    }

    /// Call right before issuing a request. Sleeps if the previous request
    /// closed a batch of `every`.
    pub async fn before_request(&mut self) {
        if self.issued > 0 && self.issued % self.every == 0 {
            info!(
                requests = self.issued,
                pause_ms = self.pause.as_millis() as u64,
                "pausing after {} requests",
                self.every
            );
            self.pauses += 1;
            tokio::time::sleep(self.pause).await;
        }
        self.issued += 1;
    }

    pub fn requests(&self) -> usize {
        self.issued
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pauses_after_each_full_batch() {
        let mut pacer = RequestPacer::new(100, Duration::ZERO);
        for _ in 0..100 {
            pacer.before_request().await;
        }
        assert_eq!(pacer.pauses(), 0);

        // Request 101 is the first one that has to wait
        pacer.before_request().await;
        assert_eq!(pacer.pauses(), 1);

        for _ in 0..100 {
            pacer.before_request().await;
        }
        assert_eq!(pacer.requests(), 201);
        assert_eq!(pacer.pauses(), 2);
    }

    #[tokio::test]
    async fn test_zero_batch_is_treated_as_one() {
        let mut pacer = RequestPacer::new(0, Duration::ZERO);
        for _ in 0..3 {
            pacer.before_request().await;
        }
        assert_eq!(pacer.pauses(), 2);
    }
}
