// ABOUTME: Fixed-rate limiter pacing outbound submits to the configured transactions per second
// ABOUTME: The rate can change between sends; the first submit after a pause goes out immediately

use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Paces submits so no more than `tps` leave per second
#[derive(Debug)]
pub struct RateLimiter {
    /// Current rate limit (messages per second)
    tps: u32,
    /// Earliest instant the next submit may be written
    next_slot: Option<Instant>,
}

impl RateLimiter {
    pub fn new(tps: u32) -> Self {
        Self {
            tps,
            next_slot: None,
        }
    }

    /// Change the rate. A slot already reserved at the old rate is moved so
    /// it lies one new interval after the previous submit.
    pub fn set_rate(&mut self, tps: u32) {
        if tps == self.tps {
            return;
        }
        let old_delay = self.message_delay();
        self.tps = tps;
        if let Some(slot) = self.next_slot {
            let previous = slot.checked_sub(old_delay).unwrap_or(slot);
            self.next_slot = Some(previous + self.message_delay());
        }
    }

    pub fn rate(&self) -> u32 {
        self.tps
    }

    /// Delay between messages based on current rate
    pub fn message_delay(&self) -> Duration {
        if self.tps == 0 {
            Duration::from_secs(1)
        } else {
            Duration::from_secs_f64(1.0 / f64::from(self.tps))
        }
    }

    /// Wait for the next free slot and claim it
    pub async fn acquire(&mut self) {
        let now = Instant::now();
        let slot = match self.next_slot {
            Some(slot) if slot > now => {
                trace!("rate limited, waiting {:?}", slot - now);
                sleep_until(slot).await;
                slot
            }
            _ => now,
        };
        self.next_slot = Some(slot + self.message_delay());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_delay_calculation() {
        assert_eq!(RateLimiter::new(10).message_delay(), Duration::from_millis(100));
        assert_eq!(RateLimiter::new(0).message_delay(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_paces_submits() {
        let mut limiter = RateLimiter::new(4);
        let start = Instant::now();

        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::ZERO);

        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_change_applies_to_next_slot() {
        let mut limiter = RateLimiter::new(1);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.set_rate(10);
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_millis(100));

        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_millis(200));
        assert_eq!(limiter.rate(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slower_rate_extends_reserved_slot() {
        let mut limiter = RateLimiter::new(10);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.set_rate(2);
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_millis(500));

        // an unchanged rate leaves the reservation alone
        limiter.set_rate(2);
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_secs(1));
    }
}
