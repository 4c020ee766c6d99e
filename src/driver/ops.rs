//! Multi-frame screen operations as explicit continuations.
//!
//! Each operation advances by at most one displayed logical frame per call to
//! [`ActiveOp::advance`]; a call that produced a frame returns [`Poll::Yielded`], which is the
//! logic side's single suspension point.

use std::path::PathBuf;

use crate::effects::transition::{DEFAULT_TRANSITION_FRAMES, DEFAULT_VAGUE};
use crate::foundation::core::Brightness;
use crate::foundation::error::FramepaceResult;
use crate::screen::graphics::Graphics;

/// Transition mask source.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MaskSource {
    /// Plain cross-dissolve.
    #[default]
    None,
    /// Image file decoded with the `image` crate; the red channel drives the wipe.
    Path(PathBuf),
    /// Already-decoded bitmap.
    Bitmap(image::RgbaImage),
}

/// Arguments of a transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRequest {
    /// Number of displayed frames.
    pub duration: u32,
    /// Optional wipe mask.
    pub mask: MaskSource,
    /// Raw vague width, clamped to `[1, 256]`.
    pub vague: u32,
}

impl Default for TransitionRequest {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TRANSITION_FRAMES,
            mask: MaskSource::None,
            vague: DEFAULT_VAGUE,
        }
    }
}

/// A screen operation yielded by application logic.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOp {
    /// Render and show one frame.
    Update,
    /// `n` consecutive updates.
    Wait(u32),
    /// Fade brightness to 0 over `duration` frames (at least 1).
    FadeOut(u32),
    /// Fade brightness to 255 over `duration` frames (at least 1).
    FadeIn(u32),
    /// Composite the frozen screen into the current one.
    Transition(TransitionRequest),
}

impl FrameOp {
    /// Ten-frame cross-dissolve with the default vague width.
    pub fn transition() -> Self {
        Self::Transition(TransitionRequest::default())
    }

    /// Cross-dissolve over `duration` frames.
    pub fn transition_for(duration: u32) -> Self {
        Self::Transition(TransitionRequest {
            duration,
            ..TransitionRequest::default()
        })
    }

    /// Masked wipe from an image file. An empty path means no mask.
    pub fn transition_with_mask(duration: u32, path: impl Into<PathBuf>, vague: u32) -> Self {
        let path = path.into();
        let mask = if path.as_os_str().is_empty() {
            MaskSource::None
        } else {
            MaskSource::Path(path)
        };
        Self::Transition(TransitionRequest {
            duration,
            mask,
            vague,
        })
    }

    /// Masked wipe from a decoded bitmap.
    pub fn transition_with_bitmap(duration: u32, bitmap: image::RgbaImage, vague: u32) -> Self {
        Self::Transition(TransitionRequest {
            duration,
            mask: MaskSource::Bitmap(bitmap),
            vague,
        })
    }
}

/// Result of one advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Poll {
    /// One logical frame was produced; control returns to the driver.
    Yielded,
    /// Nothing left to do; no frame was produced by this call.
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeDir {
    Out,
    In,
}

/// An operation in progress.
#[derive(Debug)]
pub(crate) enum ActiveOp {
    Update {
        done: bool,
    },
    Wait {
        remaining: u32,
    },
    Fade {
        dir: FadeDir,
        duration: u32,
        start: Option<u8>,
        index: u32,
    },
    Transition {
        request: Option<TransitionRequest>,
    },
}

impl ActiveOp {
    pub(crate) fn new(op: FrameOp) -> Self {
        match op {
            FrameOp::Update => Self::Update { done: false },
            FrameOp::Wait(n) => Self::Wait { remaining: n },
            FrameOp::FadeOut(d) => Self::fade(FadeDir::Out, d),
            FrameOp::FadeIn(d) => Self::fade(FadeDir::In, d),
            FrameOp::Transition(req) => Self::Transition { request: Some(req) },
        }
    }

    fn fade(dir: FadeDir, duration: u32) -> Self {
        Self::Fade {
            dir,
            duration: duration.max(1),
            start: None,
            index: 0,
        }
    }

    pub(crate) fn advance(&mut self, gfx: &mut Graphics) -> FramepaceResult<Poll> {
        match self {
            Self::Update { done } => {
                if *done {
                    return Ok(Poll::Complete);
                }
                gfx.update_frame()?;
                *done = true;
                Ok(Poll::Yielded)
            }
            Self::Wait { remaining } => {
                if *remaining == 0 {
                    return Ok(Poll::Complete);
                }
                gfx.update_frame()?;
                *remaining -= 1;
                Ok(Poll::Yielded)
            }
            Self::Fade {
                dir,
                duration,
                start,
                index,
            } => {
                if *index > *duration {
                    return Ok(Poll::Complete);
                }
                let from = *start.get_or_insert(gfx.brightness());
                if *index < *duration {
                    gfx.set_brightness_level(fade_level(*dir, from, *index, *duration));
                    gfx.fade_frame()?;
                } else {
                    let end = match dir {
                        FadeDir::Out => Brightness::BLACK,
                        FadeDir::In => Brightness::FULL,
                    };
                    gfx.set_brightness_level(end);
                    gfx.update_frame()?;
                }
                *index += 1;
                Ok(Poll::Yielded)
            }
            Self::Transition { request } => {
                if let Some(req) = request.take() {
                    let mask = match req.mask {
                        MaskSource::None => None,
                        MaskSource::Path(path) => Some(image::open(&path)?.to_rgba8()),
                        MaskSource::Bitmap(bitmap) => Some(bitmap),
                    };
                    if !gfx.begin_transition(req.duration, mask, req.vague)? {
                        return Ok(Poll::Complete);
                    }
                }
                if gfx.transition_frame()? {
                    Ok(Poll::Yielded)
                } else {
                    Ok(Poll::Complete)
                }
            }
        }
    }
}

fn fade_level(dir: FadeDir, start: u8, index: u32, duration: u32) -> Brightness {
    let start = f32::from(start);
    let t = index as f32 / duration as f32;
    match dir {
        FadeDir::Out => Brightness::from_level(start - start * t),
        FadeDir::In => Brightness::from_level(start + (255.0 - start) * t),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/ops.rs"]
mod tests;
