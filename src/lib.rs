//! framepace is the frame-pacing and render-orchestration core of a 2D screen compositor.
//!
//! It runs application logic at a fixed logical frame rate on displays refreshing at any rate,
//! encodes every logical frame through a dedicated render thread, and implements the
//! freeze / fade / cross-dissolve / masked-wipe screen transitions on top of three screen
//! buffers.
//!
//! - Build a [`Graphics`] from a [`ScreenConfig`] (or [`Graphics::headless`] for the software
//!   device)
//! - Register [`DrawableProducer`]s and tick observers
//! - Drive your [`Logic`] with a [`CoroutineDriver`], one [`CoroutineDriver::present_cycle`]
//!   per display refresh
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub(crate) mod config;
pub(crate) mod device;
pub(crate) mod driver;
pub(crate) mod effects;
pub(crate) mod pipeline;
pub(crate) mod present;
pub(crate) mod render;
pub(crate) mod screen;
pub(crate) mod timing;

pub use crate::foundation::core::{
    Affine, Brightness, FrameRGBA, IntRect, OPAQUE_BLACK, Point, PremulRgba8, Rect, Resolution,
    Size,
};
pub use crate::foundation::error::{FramepaceError, FramepaceResult};

pub use crate::config::{CompatMode, MAX_FRAME_RATE, MIN_FRAME_RATE, ScreenConfig, clamp_frame_rate};
pub use crate::device::cpu::{CpuDevice, CpuDeviceOpts};
pub use crate::device::{
    BlendType, DeviceInfo, Pipeline, Quad, RenderDevice, RenderTarget, Sampling, TextureDesc,
    TextureId,
};
pub use crate::driver::coroutine::{CoroutineDriver, Logic, LogicFlow, PresentReport};
pub use crate::driver::ops::{FrameOp, MaskSource, TransitionRequest};
pub use crate::effects::composite::{
    alpha_transition_px, brightness_overlay, crossfade, over, vague_mix_alpha, vague_transition_px,
};
pub use crate::effects::transition::{
    DEFAULT_TRANSITION_FRAMES, DEFAULT_VAGUE, TransitionEngine, TransitionPhase, TransitionState,
    VagueWidth,
};
pub use crate::pipeline::drawable::{DrawableProducer, ProducerId, RenderParams, RenderPhase};
pub use crate::pipeline::tick::{TickObservers, TickSubscription};
pub use crate::present::compositor::{PresentOverlay, PresentSettings, SurfaceMapping, letterbox};
pub use crate::present::window::{HeadlessWindow, WindowSurface};
pub use crate::render::agent::{FrameTarget, RenderAgent};
pub use crate::render::worker::RenderWorker;
pub use crate::screen::buffers::{BufferSlot, ScreenBufferManager, ScreenBufferSet};
pub use crate::screen::graphics::{Disposable, Graphics};
pub use crate::screen::transform::{WorldTransform, full_uv};
pub use crate::timing::clock::{ManualClock, SystemClock, TickSource};
pub use crate::timing::scheduler::{FrameScheduler, FrameTimingState};
