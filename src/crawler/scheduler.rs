//! Politeness scheduling
//!
//! The crawl is strictly sequential; the only pacing control is a fixed
//! pause taken before every fetch attempt, including attempts that end up
//! filtered before any request is sent.

use crate::config::CrawlerConfig;
use std::time::Duration;

/// Inserts the fixed politeness delay between fetch attempts
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Pause before each fetch attempt
    delay: Duration,

    /// Number of pauses taken so far
    pauses: u32,
}

impl Scheduler {
    /// Creates a scheduler with the given delay
    pub fn new(delay: Duration) -> Self {
        Self { delay, pauses: 0 }
    }

    /// Creates a scheduler from the crawler's `request-delay` (milliseconds)
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(Duration::from_millis(config.request_delay))
    }

    /// Waits out the politeness delay
    ///
    /// Yields to the runtime instead of blocking the thread.
    pub async fn pause(&mut self) {
        self.pauses += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pauses(&self) -> u32 {
        self.pauses
    }

    /// Total time spent pausing
    pub fn total_delay(&self) -> Duration {
        self.delay * self.pauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_from_config() {
        let config = CrawlerConfig {
            request_delay: 250,
            ..CrawlerConfig::default()
        };
        let scheduler = Scheduler::from_config(&config);
        assert_eq!(scheduler.delay(), Duration::from_millis(250));
        assert_eq!(scheduler.pauses(), 0);
    }

    #[tokio::test]
    async fn test_pause_waits_for_delay() {
        let mut scheduler = Scheduler::new(Duration::from_millis(30));
        let start = Instant::now();
        scheduler.pause().await;
        scheduler.pause().await;

        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(scheduler.pauses(), 2);
        assert_eq!(scheduler.total_delay(), Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_zero_delay_still_counts() {
        let mut scheduler = Scheduler::new(Duration::ZERO);
        scheduler.pause().await;
        assert_eq!(scheduler.pauses(), 1);
        assert_eq!(scheduler.total_delay(), Duration::ZERO);
    }
}
