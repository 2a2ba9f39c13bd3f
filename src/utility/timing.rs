// ============================================
// TIMING UTILITY
// ============================================
// Usage:
//   let timer = Timer::start_with_threshold("fetch cycle", 2000);
//   ...
//   let elapsed = timer.stop();      // logs and returns the duration
//   timer.elapsed_ms()               // peek without logging
// ============================================

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Timer for measuring a fetch-process-render cycle
pub struct Timer {
    name: String,
    start: Instant,
    threshold_ms: u128,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            threshold_ms: 0,
        }
    }

    /// Only report at info level once execution exceeds `threshold_ms`
    pub fn start_with_threshold(name: impl Into<String>, threshold_ms: u128) -> Self {
        Self {
            threshold_ms,
            ..Self::start(name)
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Past a non-zero threshold
    pub fn is_slow(&self, duration: Duration) -> bool {
        self.threshold_ms > 0 && duration.as_millis() >= self.threshold_ms
    }

    /// Stop the timer and log the result
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        let ms = duration.as_millis();

        if self.is_slow(duration) {
            info!(name = %self.name, elapsed_ms = ms as u64, "slow operation");
        } else {
            debug!(name = %self.name, elapsed_ms = ms as u64, "operation finished");
        }
        duration
    }
}
