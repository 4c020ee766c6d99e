//! Monotonic tick sources.
//!
//! The scheduler only ever sees raw counter values plus the counter frequency, the same shape
//! as a platform performance counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A monotonic counter with a fixed frequency (ticks per second).
pub trait TickSource {
    /// Current counter value.
    fn now(&self) -> u64;
    /// Ticks per second.
    fn frequency(&self) -> u64;
}

/// Wall-clock tick source with nanosecond resolution.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Counter starting at zero now.
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

impl TickSource for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// Hand-driven tick source for headless hosts and tests.
///
/// Clones share the same counter.
#[derive(Clone, Debug)]
pub struct ManualClock {
    ticks: Arc<AtomicU64>,
    frequency: u64,
}

impl ManualClock {
    /// Counter at zero with the given frequency (clamped to at least 1).
    pub fn new(frequency: u64) -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(0)),
            frequency: frequency.max(1),
        }
    }

    /// Move the counter forward.
    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }

    /// Advance by one period of a display refreshing at `hz`.
    pub fn advance_refresh(&self, hz: u32) {
        self.advance(self.frequency / u64::from(hz.max(1)));
    }
}

impl TickSource for ManualClock {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    fn frequency(&self) -> u64 {
        self.frequency
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/clock.rs"]
mod tests;
