//! Time sources for the scheduler
//!
//! Runs measure elapsed time against a [`Clock`] in milliseconds.
//! [`SystemClock`] follows wall time; [`ManualClock`] is advanced explicitly
//! and is what tests and headless hosts use to simulate frames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time measured from the clock's creation
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one clone and hand
/// another to the scheduler.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_ms.to_bits())),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: f64) {
        self.bits.store(now_ms.to_bits(), Ordering::Release);
    }

    /// Move forward by `delta_ms`, returning the new time
    pub fn advance(&self, delta_ms: f64) -> f64 {
        let next = self.now_ms() + delta_ms;
        self.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(10.0);
        let other = clock.clone();

        assert_eq!(other.now_ms(), 10.0);
        assert_eq!(clock.advance(16.5), 26.5);
        assert_eq!(other.now_ms(), 26.5);

        other.set(500.0);
        assert_eq!(clock.now_ms(), 500.0);
    }

    #[test]
    fn test_manual_clock_default_is_zero() {
        assert_eq!(ManualClock::default().now_ms(), 0.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(clock.now_ms() > a);
    }
}
