//! Fixed-rate tick pacing

use std::thread;
use std::time::{Duration, Instant};

/// Blocks until one tick period has passed since the previous tick
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    period: Duration,
    last: Instant,
}

impl FrameLimiter {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / tick_rate.max(1),
            last: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep out the remainder of the current period
    pub fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }

    /// Start a fresh period (after a pause such as a prompt)
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_rate() {
        assert_eq!(FrameLimiter::new(50).period(), Duration::from_millis(20));
        // Zero is treated as one tick per second
        assert_eq!(FrameLimiter::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_wait_paces_ticks() {
        let mut limiter = FrameLimiter::new(100);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(25));
    }
}
