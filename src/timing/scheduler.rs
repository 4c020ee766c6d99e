//! Logical-rate / display-rate decoupling.
//!
//! Once per display refresh the driver asks [`FrameScheduler::tick`] how many logical frames to
//! run before the next present. The decision is an exponential moving average over the measured
//! refresh/logic ratio: near 1:1 it emits steady single frames (with the occasional catch-up of
//! two), and on displays faster than the logic rate it falls back to a fractional accumulator
//! that skips refreshes.

/// Weight kept from the previous smoothed rate on every update.
pub const SMOOTHING_DECAY: f64 = 0.8;
/// Upper bound on a single measured rate fed into the average.
pub const RATE_CLAMP: f64 = 2.0;
/// Smoothed rate at or above which the scheduler stops accumulating and renders every refresh.
pub const CATCH_UP_THRESHOLD: f64 = 0.9;

/// Persistent scheduler state, mutated once per present call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTimingState {
    /// Counter value at the previous present call.
    pub last_tick: u64,
    /// Ticks per logical frame (`frequency / frame_rate`, at least 1).
    pub desired_interval: u64,
    /// Exponential moving average of the clamped measured rate, within `[0, RATE_CLAMP]`.
    pub smoothed_rate: f64,
    /// Frames owed while the smoothed rate is below the catch-up threshold. Never negative; a
    /// stall leaves a backlog that is paid off one frame per refresh.
    pub accumulator: f64,
}

/// EMA-based repeat-count scheduler.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    state: FrameTimingState,
}

impl FrameScheduler {
    /// Start timing at `now` for a counter running at `frequency` ticks per second.
    pub fn new(now: u64, frequency: u64, frame_rate: u32) -> Self {
        Self {
            state: initial_state(now, frequency, frame_rate),
        }
    }

    /// Forget all history, as after an explicit frame-rate change.
    pub fn reset(&mut self, now: u64, frequency: u64, frame_rate: u32) {
        self.state = initial_state(now, frequency, frame_rate);
        tracing::debug!(
            desired_interval = self.state.desired_interval,
            frame_rate,
            "frame timing reset"
        );
    }

    /// Measure the time since the previous call and decide the repeat count.
    pub fn tick(&mut self, now: u64) -> u32 {
        let elapsed = now.saturating_sub(self.state.last_tick);
        self.state.last_tick = now;
        let rate = elapsed as f64 / self.state.desired_interval as f64;
        let repeat = self.repeat_for_rate(rate);
        tracing::trace!(
            elapsed,
            rate,
            smoothed = self.state.smoothed_rate,
            repeat,
            "repeat count"
        );
        repeat
    }

    /// Fold one measured rate (logical frames elapsed) into the average and decide.
    pub fn repeat_for_rate(&mut self, rate: f64) -> u32 {
        let rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
        let s = &mut self.state;
        s.smoothed_rate = s.smoothed_rate * SMOOTHING_DECAY + rate.min(RATE_CLAMP) * (1.0 - SMOOTHING_DECAY);

        if s.smoothed_rate >= CATCH_UP_THRESHOLD {
            s.accumulator = 0.0;
            return s.smoothed_rate.round() as u32;
        }

        s.accumulator += rate;
        if s.accumulator >= 1.0 {
            s.accumulator -= 1.0;
            return 1;
        }
        0
    }

    /// Current state snapshot.
    pub fn state(&self) -> FrameTimingState {
        self.state
    }

    /// Ticks per logical frame.
    pub fn desired_interval(&self) -> u64 {
        self.state.desired_interval
    }
}

fn initial_state(now: u64, frequency: u64, frame_rate: u32) -> FrameTimingState {
    FrameTimingState {
        last_tick: now,
        desired_interval: (frequency / u64::from(frame_rate.max(1))).max(1),
        smoothed_rate: 1.0,
        accumulator: 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/scheduler.rs"]
mod tests;
