//! Freeze / transition state machine.
//!
//! `Idle -> Frozen -> Transitioning -> Idle`. The engine only tracks phase and progress; the
//! buffers it talks about are owned by the render thread and driven by
//! [`crate::Graphics`].

use crate::device::TextureId;

/// Lowest raw vague width.
pub const MIN_VAGUE: u32 = 1;
/// Highest raw vague width.
pub const MAX_VAGUE: u32 = 256;
/// Raw vague width used when the caller does not pass one.
pub const DEFAULT_VAGUE: u32 = 40;
/// Duration used by the argument-less transition form.
pub const DEFAULT_TRANSITION_FRAMES: u32 = 10;

/// Current phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Ordinary rendering.
    #[default]
    Idle,
    /// The frozen buffer is on screen; ordinary rendering is suppressed.
    Frozen,
    /// Compositing frozen against new scene.
    Transitioning,
}

/// Softness of the masked wipe edge, normalized from the raw `[1, 256]` range by 255.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VagueWidth(f32);

impl VagueWidth {
    /// Clamp a raw width into `[MIN_VAGUE, MAX_VAGUE]` and normalize.
    pub fn from_raw(raw: u32) -> Self {
        let clamped = raw.clamp(MIN_VAGUE, MAX_VAGUE);
        if clamped != raw {
            tracing::warn!(requested = raw, clamped, "vague width out of range");
        }
        Self(clamped as f32 / 255.0)
    }

    /// Normalized width.
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for VagueWidth {
    fn default() -> Self {
        Self::from_raw(DEFAULT_VAGUE)
    }
}

/// Parameters and progress of the running transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    /// Number of displayed frames.
    pub duration: u32,
    /// Next step index, in `[0, duration]`.
    pub index: u32,
    /// Mask texture for the masked wipe; `None` for the plain cross-dissolve.
    pub mask: Option<TextureId>,
    /// Wipe edge width.
    pub vague: VagueWidth,
}

impl TransitionState {
    /// Progress of the current step: `index / duration`, never reaching 1.
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.index as f32 * (1.0 / self.duration as f32)
    }
}

/// Freeze/transition sequencing.
#[derive(Debug, Default)]
pub struct TransitionEngine {
    phase: TransitionPhase,
    state: Option<TransitionState>,
}

impl TransitionEngine {
    /// Idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// `true` from `freeze` until the end of the following transition.
    pub fn is_frozen(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Enter `Frozen`. Returns `false` (and changes nothing) when already frozen.
    pub fn freeze(&mut self) -> bool {
        if self.is_frozen() {
            return false;
        }
        self.phase = TransitionPhase::Frozen;
        tracing::debug!("screen frozen");
        true
    }

    /// Start a transition. Returns `false` unless the engine is `Frozen`.
    pub fn begin(&mut self, duration: u32, mask: Option<TextureId>, vague: VagueWidth) -> bool {
        if self.phase != TransitionPhase::Frozen {
            return false;
        }
        self.phase = TransitionPhase::Transitioning;
        self.state = Some(TransitionState {
            duration,
            index: 0,
            mask,
            vague,
        });
        tracing::debug!(duration, masked = mask.is_some(), vague = vague.get(), "transition started");
        true
    }

    /// Running transition, if any.
    pub fn active(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    /// Advance one displayed frame, returning its progress, or `None` once all steps are used.
    pub fn next_step(&mut self) -> Option<f32> {
        if self.phase != TransitionPhase::Transitioning {
            return None;
        }
        let state = self.state.as_mut()?;
        if state.index >= state.duration {
            return None;
        }
        let progress = state.progress();
        state.index += 1;
        Some(progress)
    }

    /// Return to `Idle`, discarding the transition. Yields the mask texture to release.
    pub fn finish(&mut self) -> Option<TextureId> {
        self.phase = TransitionPhase::Idle;
        let mask = self.state.take().and_then(|s| s.mask);
        tracing::debug!("transition finished");
        mask
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transition.rs"]
mod tests;
