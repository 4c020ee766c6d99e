//! Driver / logic handoff.
//!
//! The host owns the present loop and calls [`CoroutineDriver::present_cycle`] once per display
//! refresh. The application logic is an explicit step function: each call returns the next
//! [`FrameOp`], and the driver advances that op until it produces a frame. That frame is the
//! logic side's one suspension point; the driver resumes it `repeat` times per cycle as decided
//! by the frame scheduler.

use crate::driver::ops::{ActiveOp, FrameOp, Poll};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::screen::graphics::Graphics;

/// Steps the logic may take in a row without producing a frame before the driver gives up.
pub const MAX_IDLE_STEPS: u32 = 4096;

/// What the logic wants next.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicFlow {
    /// Run this operation; control returns when it has produced a frame.
    Yield(FrameOp),
    /// The logic is done. Later resumptions return immediately.
    Exit(i32),
}

/// Application logic driven one operation at a time.
pub trait Logic {
    /// Decide the next operation. Non-frame work (state updates, freeze, brightness) happens
    /// here directly on `gfx`.
    fn step(&mut self, gfx: &mut Graphics) -> FramepaceResult<LogicFlow>;
}

impl<F> Logic for F
where
    F: FnMut(&mut Graphics) -> FramepaceResult<LogicFlow>,
{
    fn step(&mut self, gfx: &mut Graphics) -> FramepaceResult<LogicFlow> {
        self(gfx)
    }
}

/// Outcome of one present cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresentReport {
    /// Repeat count chosen by the scheduler.
    pub repeat: u32,
    /// Logical frames actually produced.
    pub frames: u32,
    /// `true` once the logic has exited.
    pub finished: bool,
}

/// Resumes logic a scheduler-chosen number of times per display refresh, then presents.
#[derive(Debug)]
pub struct CoroutineDriver<L> {
    logic: L,
    active: Option<ActiveOp>,
    exit_code: Option<i32>,
}

impl<L: Logic> CoroutineDriver<L> {
    /// Wrap `logic`. Nothing runs until the first resumption.
    pub fn new(logic: L) -> Self {
        Self {
            logic,
            active: None,
            exit_code: None,
        }
    }

    /// `true` once the logic returned [`LogicFlow::Exit`].
    pub fn is_finished(&self) -> bool {
        self.exit_code.is_some()
    }

    /// Exit code reported by the logic.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// The wrapped logic.
    pub fn logic(&self) -> &L {
        &self.logic
    }

    /// The wrapped logic, mutably.
    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    /// Run logic up to its next frame. Returns `false` when it has exited instead.
    pub fn resume(&mut self, gfx: &mut Graphics) -> FramepaceResult<bool> {
        if self.is_finished() {
            return Ok(false);
        }
        let mut idle_steps = 0u32;
        loop {
            if let Some(op) = self.active.as_mut() {
                match op.advance(gfx)? {
                    Poll::Yielded => return Ok(true),
                    Poll::Complete => self.active = None,
                }
            }

            if idle_steps >= MAX_IDLE_STEPS {
                return Err(FramepaceError::Other(anyhow::anyhow!(
                    "logic made {idle_steps} steps without producing a frame"
                )));
            }
            idle_steps += 1;

            match self.logic.step(gfx)? {
                LogicFlow::Yield(op) => self.active = Some(ActiveOp::new(op)),
                LogicFlow::Exit(code) => {
                    tracing::debug!(code, "logic finished");
                    self.exit_code = Some(code);
                    return Ok(false);
                }
            }
        }
    }

    /// One display refresh: decide the repeat count, resume that many times, present.
    ///
    /// Only resumptions after the first may skip rendering, and only when frame skipping is
    /// allowed.
    pub fn present_cycle(&mut self, gfx: &mut Graphics) -> FramepaceResult<PresentReport> {
        let repeat = gfx.determine_repeat();
        let mut frames = 0;
        for i in 0..repeat {
            gfx.set_frame_skip_required(i != 0);
            if self.resume(gfx)? {
                frames += 1;
            }
        }
        gfx.set_frame_skip_required(false);
        gfx.present()?;
        tracing::trace!(repeat, frames, "present cycle");
        Ok(PresentReport {
            repeat,
            frames,
            finished: self.is_finished(),
        })
    }
}
