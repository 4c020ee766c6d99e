//! Logic-side screen facade.
//!
//! `Graphics` owns everything the logic thread may touch: the frame scheduler, brightness,
//! freeze/transition state, drawable producers and tick observers. GPU resources stay on the
//! render thread inside [`RenderAgent`] and are only reached through posted tasks.

use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::config::{CompatMode, ScreenConfig, clamp_frame_rate};
use crate::device::cpu::{CpuDevice, CpuDeviceOpts};
use crate::device::{
    DeviceInfo, Pipeline, Quad, RenderDevice, RenderTarget, TextureDesc, TextureId,
};
use crate::driver::ops::{ActiveOp, FrameOp, Poll};
use crate::effects::transition::{TransitionEngine, TransitionPhase, VagueWidth};
use crate::foundation::core::{Brightness, FrameRGBA, IntRect, Resolution};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::pipeline::drawable::{DrawableController, DrawableProducer, ProducerId};
use crate::pipeline::orchestrator::{FrameRequest, render_frame};
use crate::pipeline::tick::{TickObservers, TickSubscription};
use crate::present::compositor::{PresentCompositor, PresentOverlay, PresentSettings, SurfaceMapping};
use crate::present::window::{HeadlessWindow, WindowSurface};
use crate::render::agent::{FrameTarget, RenderAgent};
use crate::render::worker::RenderWorker;
use crate::screen::buffers::BufferSlot;
use crate::screen::transform::{WorldTransform, full_uv};
use crate::timing::clock::TickSource;
use crate::timing::scheduler::FrameScheduler;

const RENDER_THREAD_NAME: &str = "framepace-render";

/// Host object released on [`Graphics::reset`].
pub trait Disposable {
    /// Release whatever the object holds. Called at most once per reset.
    fn dispose(&mut self);
}

/// The screen: frame pacing, rendering, transitions and presentation.
pub struct Graphics {
    worker: RenderWorker<RenderAgent>,
    drawables: DrawableController,
    tick_observers: TickObservers,
    transitions: TransitionEngine,
    compositor: PresentCompositor,
    scheduler: FrameScheduler,
    clock: Box<dyn TickSource>,
    disposables: Vec<Weak<RefCell<dyn Disposable>>>,
    renderer_info: DeviceInfo,
    uv_flip: bool,
    world: WorldTransform,
    compat: CompatMode,
    resolution: Resolution,
    frame_rate: u32,
    frame_count: u64,
    brightness: Brightness,
    keep_ratio: bool,
    smooth_scale: bool,
    allow_skip_frame: bool,
    frame_skip_required: bool,
}

impl Graphics {
    /// Start the render thread, build the device there and create the screen buffers.
    ///
    /// Fails if the device or any screen buffer cannot be created.
    #[tracing::instrument(skip_all, fields(w = config.resolution.width, h = config.resolution.height))]
    pub fn new<F>(
        config: &ScreenConfig,
        device_factory: F,
        clock: Box<dyn TickSource>,
        window: Arc<dyn WindowSurface>,
    ) -> FramepaceResult<Self>
    where
        F: FnOnce() -> FramepaceResult<Box<dyn RenderDevice>> + Send + 'static,
    {
        let config = config.clone().normalized();
        let resolution = config.resolution;

        let worker = RenderWorker::spawn(RENDER_THREAD_NAME, move || {
            let device = device_factory()?;
            RenderAgent::new(device, resolution)
        })?;
        let (renderer_info, uv_flip, world) = worker.post_and_wait(|agent| {
            (
                agent.device().info(),
                agent.device().uv_flip(),
                agent.screen().world_transform(),
            )
        })?;

        let frame_rate = config.effective_frame_rate();
        let scheduler = FrameScheduler::new(clock.now(), clock.frequency(), frame_rate);

        tracing::info!(
            device = %renderer_info.device,
            vendor = %renderer_info.vendor,
            frame_rate,
            "screen initialized"
        );

        Ok(Self {
            worker,
            drawables: DrawableController::default(),
            tick_observers: TickObservers::new(),
            transitions: TransitionEngine::new(),
            compositor: PresentCompositor::new(window),
            scheduler,
            clock,
            disposables: Vec::new(),
            renderer_info,
            uv_flip,
            world,
            compat: config.compat,
            resolution,
            frame_rate,
            frame_count: 0,
            brightness: Brightness::FULL,
            keep_ratio: config.keep_ratio,
            smooth_scale: config.smooth_scale,
            allow_skip_frame: config.allow_skip_frame,
            frame_skip_required: false,
        })
    }

    /// Screen backed by the software device, sized to `window`.
    pub fn headless(
        config: &ScreenConfig,
        clock: Box<dyn TickSource>,
        window: HeadlessWindow,
    ) -> FramepaceResult<Self> {
        let opts = CpuDeviceOpts {
            window: window.size(),
            uv_flip: config.uv_flip,
            memory_budget: None,
        };
        Self::with_cpu_device(config, opts, clock, window)
    }

    /// Screen backed by a software device with explicit options.
    pub fn with_cpu_device(
        config: &ScreenConfig,
        opts: CpuDeviceOpts,
        clock: Box<dyn TickSource>,
        window: HeadlessWindow,
    ) -> FramepaceResult<Self> {
        Self::new(
            config,
            move || Ok(Box::new(CpuDevice::new(opts)) as Box<dyn RenderDevice>),
            clock,
            Arc::new(window),
        )
    }

    /// Render and process one logical frame (no present).
    pub fn update(&mut self) -> FramepaceResult<()> {
        self.perform(FrameOp::Update).map(|_| ())
    }

    /// `frames` consecutive updates.
    pub fn wait(&mut self, frames: u32) -> FramepaceResult<()> {
        self.perform(FrameOp::Wait(frames)).map(|_| ())
    }

    /// Fade to black over `duration` frames.
    pub fn fade_out(&mut self, duration: u32) -> FramepaceResult<()> {
        self.perform(FrameOp::FadeOut(duration)).map(|_| ())
    }

    /// Fade back to full brightness over `duration` frames.
    pub fn fade_in(&mut self, duration: u32) -> FramepaceResult<()> {
        self.perform(FrameOp::FadeIn(duration)).map(|_| ())
    }

    /// Transition from the frozen screen, optionally masked by an image file.
    pub fn transition(
        &mut self,
        duration: u32,
        mask_path: impl AsRef<Path>,
        vague: u32,
    ) -> FramepaceResult<()> {
        let op = FrameOp::transition_with_mask(duration, mask_path.as_ref(), vague);
        self.perform(op).map(|_| ())
    }

    /// Transition masked by an already-decoded bitmap.
    pub fn transition_with_bitmap(
        &mut self,
        duration: u32,
        bitmap: image::RgbaImage,
        vague: u32,
    ) -> FramepaceResult<()> {
        self.perform(FrameOp::transition_with_bitmap(duration, bitmap, vague))
            .map(|_| ())
    }

    /// Run `op` to completion without presenting, returning how many frames it produced.
    ///
    /// Logic driven by a [`crate::CoroutineDriver`] yields the op instead, so every frame is
    /// paced and presented.
    pub fn perform(&mut self, op: FrameOp) -> FramepaceResult<u32> {
        let mut active = ActiveOp::new(op);
        let mut frames = 0;
        while active.advance(self)? == Poll::Yielded {
            frames += 1;
        }
        Ok(frames)
    }

    /// Capture the current scene into the frozen buffer and stop ordinary rendering.
    ///
    /// A second call while frozen changes nothing.
    pub fn freeze(&mut self) -> FramepaceResult<()> {
        if self.transitions.is_frozen() {
            return Ok(());
        }
        self.render_into(FrameTarget::Screen(BufferSlot::Frozen))?;
        self.transitions.freeze();
        Ok(())
    }

    /// `true` between `freeze` and the end of the following transition.
    pub fn is_frozen(&self) -> bool {
        self.transitions.is_frozen()
    }

    /// Freeze/transition phase.
    pub fn transition_phase(&self) -> TransitionPhase {
        self.transitions.phase()
    }

    /// Render the current scene into a new image of the logical resolution.
    pub fn snapshot_to_image(&mut self) -> FramepaceResult<image::RgbaImage> {
        let size = self.resolution;
        let id = self.worker.post_and_wait(move |agent| {
            agent
                .device_mut()
                .create_texture(&TextureDesc::new(size, "snapshot"))
        })??;
        self.render_into(FrameTarget::Texture(id))?;
        let data = self.worker.post_and_wait(move |agent| {
            let data = agent.device().read_texture(id);
            agent.device_mut().destroy_texture(id);
            data
        })??;
        let frame = FrameRGBA {
            width: size.width,
            height: size.height,
            data,
            premultiplied: true,
        };
        frame
            .to_image()
            .ok_or_else(|| FramepaceError::device("snapshot readback has the wrong size"))
    }

    /// Read one screen buffer back.
    pub fn read_screen_buffer(&self, slot: BufferSlot) -> FramepaceResult<FrameRGBA> {
        let size = self.resolution;
        let data = self.worker.post_and_wait(move |agent| {
            let id = agent
                .screen()
                .texture(slot)
                .ok_or_else(|| FramepaceError::resource("screen buffers are gone"))?;
            agent.device().read_texture(id)
        })??;
        Ok(FrameRGBA {
            width: size.width,
            height: size.height,
            data,
            premultiplied: true,
        })
    }

    /// Read the window backbuffer back.
    pub fn read_backbuffer(&self) -> FramepaceResult<FrameRGBA> {
        let (size, data) = self.worker.post_and_wait(|agent| {
            let device = agent.device();
            (device.backbuffer_size(), device.read_backbuffer())
        })?;
        Ok(FrameRGBA {
            width: size.width,
            height: size.height,
            data: data?,
            premultiplied: true,
        })
    }

    /// Size of one screen buffer as the device reports it.
    pub fn screen_buffer_size(&self, slot: BufferSlot) -> FramepaceResult<Option<Resolution>> {
        self.worker.post_and_wait(move |agent| {
            let id = agent.screen().texture(slot)?;
            agent.device().texture_size(id)
        })
    }

    /// Recreate the screen buffers at a new logical resolution. Blocks until done.
    ///
    /// A creation failure leaves the screen without buffers and is fatal for the session.
    #[tracing::instrument(skip(self))]
    pub fn resize_screen(&mut self, width: u32, height: u32) -> FramepaceResult<()> {
        let res = Resolution::new(width, height);
        if res.width != width || res.height != height {
            tracing::warn!(width, height, "zero-sized logical resolution clamped");
        }
        let world = self.worker.post_and_wait(move |agent| {
            agent
                .reset_screen(res)
                .map(|()| agent.screen().world_transform())
        })??;
        self.resolution = res;
        self.world = world;
        tracing::debug!(w = res.width, h = res.height, "logical screen resized");
        Ok(())
    }

    /// Return the screen to its startup state.
    pub fn reset(&mut self) -> FramepaceResult<()> {
        if self.transitions.phase() != TransitionPhase::Idle {
            self.end_transition()?;
        }

        let disposables = std::mem::take(&mut self.disposables);
        for weak in disposables.iter().rev() {
            if let Some(obj) = weak.upgrade() {
                obj.borrow_mut().dispose();
            }
        }

        self.frame_rate = self.compat.default_frame_rate();
        self.brightness = Brightness::FULL;
        self.frame_reset();
        tracing::debug!(frame_rate = self.frame_rate, "screen reset");
        Ok(())
    }

    /// Restart frame timing from now.
    pub fn frame_reset(&mut self) {
        self.scheduler
            .reset(self.clock.now(), self.clock.frequency(), self.frame_rate);
    }

    /// Always fails: video playback is not part of this core.
    pub fn play_movie(&mut self, path: impl AsRef<Path>) -> FramepaceResult<()> {
        Err(FramepaceError::not_implemented(format!(
            "movie playback ('{}')",
            path.as_ref().display()
        )))
    }

    /// Logical width.
    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    /// Logical height.
    pub fn height(&self) -> u32 {
        self.resolution.height
    }

    /// Logical resolution.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Logical frames per second.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Change the logical rate (clamped to `[1, 1000]`) and restart frame timing.
    pub fn set_frame_rate(&mut self, rate: u32) {
        self.frame_rate = clamp_frame_rate(rate);
        self.frame_reset();
    }

    /// Logical frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Overwrite the frame counter.
    pub fn set_frame_count(&mut self, count: u64) {
        self.frame_count = count;
    }

    /// Global brightness.
    pub fn brightness(&self) -> u8 {
        self.brightness.get()
    }

    /// Set global brightness, clamped to `[0, 255]`.
    pub fn set_brightness(&mut self, value: u32) {
        self.brightness = Brightness::clamped(value);
    }

    /// Letterbox instead of stretching.
    pub fn keep_ratio(&self) -> bool {
        self.keep_ratio
    }

    /// See [`Graphics::keep_ratio`].
    pub fn set_keep_ratio(&mut self, on: bool) {
        self.keep_ratio = on;
    }

    /// Linear filtering when scaling to the window.
    pub fn smooth_scale(&self) -> bool {
        self.smooth_scale
    }

    /// See [`Graphics::smooth_scale`].
    pub fn set_smooth_scale(&mut self, on: bool) {
        self.smooth_scale = on;
    }

    /// Same-cycle catch-up frames may skip rendering.
    pub fn allow_skip_frame(&self) -> bool {
        self.allow_skip_frame
    }

    /// See [`Graphics::allow_skip_frame`].
    pub fn set_allow_skip_frame(&mut self, on: bool) {
        self.allow_skip_frame = on;
    }

    /// Device identification.
    pub fn renderer_info(&self) -> &DeviceInfo {
        &self.renderer_info
    }

    /// Where the last present put the logical screen in the window.
    pub fn surface_mapping(&self) -> Option<SurfaceMapping> {
        self.compositor.mapping()
    }

    /// Register a drawable producer.
    pub fn add_drawable(&mut self, producer: Box<dyn DrawableProducer>) -> ProducerId {
        self.drawables.add(producer)
    }

    /// Unregister a drawable producer.
    pub fn remove_drawable(&mut self, id: ProducerId) -> Option<Box<dyn DrawableProducer>> {
        self.drawables.remove(id)
    }

    /// Run `callback` once per logical frame after the frame's pass is encoded.
    pub fn add_tick_observer(&self, callback: impl FnMut() + 'static) -> TickSubscription {
        self.tick_observers.add(callback)
    }

    /// The tick observer list (cloning shares it).
    pub fn tick_observers(&self) -> &TickObservers {
        &self.tick_observers
    }

    /// Dispose `obj` on the next [`Graphics::reset`] unless it is dropped first.
    pub fn add_disposable<D: Disposable + 'static>(&mut self, obj: &Rc<RefCell<D>>) {
        let strong: Rc<RefCell<dyn Disposable>> = obj.clone();
        let weak = Rc::downgrade(&strong);
        self.disposables.retain(|w| w.strong_count() > 0);
        self.disposables.push(weak);
    }

    /// Install (or remove) the UI drawn over the presented screen.
    pub fn set_overlay(&self, overlay: Option<Box<dyn PresentOverlay>>) -> FramepaceResult<()> {
        self.worker.post_task(move |agent| agent.overlay = overlay)
    }

    /// Queue work on the render thread behind everything already posted.
    pub fn post_task<F>(&self, task: F) -> FramepaceResult<()>
    where
        F: FnOnce(&mut RenderAgent) + Send + 'static,
    {
        self.worker.post_task(task)
    }

    /// Block until every task posted so far has run.
    pub fn wait_synchronize(&self) -> FramepaceResult<()> {
        self.worker.wait_synchronize()
    }

    /// Run `task` on the render thread and return its value.
    pub fn post_and_wait<R, F>(&self, task: F) -> FramepaceResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut RenderAgent) -> R + Send + 'static,
    {
        self.worker.post_and_wait(task)
    }

    /// Blit the present source into the window and present it. Blocks until presented.
    pub fn present(&mut self) -> FramepaceResult<()> {
        let settings = PresentSettings {
            keep_ratio: self.keep_ratio,
            smooth: self.smooth_scale,
        };
        self.compositor
            .present(&self.worker, self.resolution, settings)
    }

    pub(crate) fn determine_repeat(&mut self) -> u32 {
        self.scheduler.tick(self.clock.now())
    }

    pub(crate) fn set_frame_skip_required(&mut self, required: bool) {
        self.frame_skip_required = required;
    }

    pub(crate) fn set_brightness_level(&mut self, level: Brightness) {
        self.brightness = level;
    }

    /// One ordinary logical frame into the main buffer.
    pub(crate) fn update_frame(&mut self) -> FramepaceResult<()> {
        let skip = self.allow_skip_frame && self.frame_skip_required;
        if !self.transitions.is_frozen() && !skip {
            self.render_into(FrameTarget::Screen(BufferSlot::Main))?;
        }
        self.frame_process(BufferSlot::Main)
    }

    /// One fade frame: the frozen buffer while frozen, otherwise an ordinary update.
    pub(crate) fn fade_frame(&mut self) -> FramepaceResult<()> {
        if self.transitions.is_frozen() {
            self.frame_process(BufferSlot::Frozen)
        } else {
            self.update_frame()
        }
    }

    /// Publish the present source and run the per-frame bookkeeping.
    fn frame_process(&mut self, source: BufferSlot) -> FramepaceResult<()> {
        self.worker
            .post_task(move |agent| agent.present_source = Some(source))?;
        self.frame_count += 1;
        self.tick_observers.notify();
        Ok(())
    }

    fn render_into(&mut self, target: FrameTarget) -> FramepaceResult<()> {
        let req = FrameRequest {
            target,
            resolution: self.resolution,
            world: self.world,
            brightness: self.brightness,
        };
        render_frame(&self.worker, &mut self.drawables, req)
    }

    /// Start a transition. Returns `false` (a no-op) unless frozen.
    #[tracing::instrument(skip(self, mask), fields(masked = mask.is_some()))]
    pub(crate) fn begin_transition(
        &mut self,
        duration: u32,
        mask: Option<image::RgbaImage>,
        vague: u32,
    ) -> FramepaceResult<bool> {
        if self.transitions.phase() != TransitionPhase::Frozen {
            tracing::debug!("transition without freeze ignored");
            return Ok(false);
        }

        self.brightness = Brightness::FULL;
        let vague = VagueWidth::from_raw(vague);

        let mask_id = match mask {
            Some(img) => Some(self.upload_mask(&img)?),
            None => None,
        };

        self.render_into(FrameTarget::Screen(BufferSlot::Transition))?;
        self.transitions.begin(duration, mask_id, vague);
        Ok(true)
    }

    /// Composite and process the next transition frame. Returns `false` once the transition
    /// is over (and cleans it up).
    pub(crate) fn transition_frame(&mut self) -> FramepaceResult<bool> {
        let Some(progress) = self.transitions.next_step() else {
            self.end_transition()?;
            return Ok(false);
        };
        let (mask, vague) = match self.transitions.active() {
            Some(s) => (s.mask, s.vague.get()),
            None => (None, VagueWidth::default().get()),
        };
        let uv_flip = self.uv_flip;
        self.worker.post_task(move |agent| {
            composite_transition(agent, mask, vague, progress, uv_flip);
        })?;
        self.frame_process(BufferSlot::Main)?;
        Ok(true)
    }

    fn end_transition(&mut self) -> FramepaceResult<()> {
        if let Some(mask) = self.transitions.finish() {
            self.worker
                .post_task(move |agent| agent.device_mut().destroy_texture(mask))?;
        }
        Ok(())
    }

    fn upload_mask(&self, img: &image::RgbaImage) -> FramepaceResult<TextureId> {
        let size = Resolution::new(img.width(), img.height());
        // Only the red channel is sampled, so texels go up straight (not premultiplied).
        let data = img.as_raw().clone();
        self.worker.post_and_wait(move |agent| {
            agent
                .device_mut()
                .create_texture_with_data(&TextureDesc::new(size, "transition.mask"), &data)
        })?
    }
}

impl std::fmt::Debug for Graphics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphics")
            .field("resolution", &self.resolution)
            .field("frame_rate", &self.frame_rate)
            .field("frame_count", &self.frame_count)
            .field("brightness", &self.brightness)
            .field("phase", &self.transitions.phase())
            .finish_non_exhaustive()
    }
}

fn composite_transition(
    agent: &mut RenderAgent,
    mask: Option<TextureId>,
    vague: f32,
    progress: f32,
    uv_flip: bool,
) {
    let Some(buffers) = agent.screen().buffers().copied() else {
        tracing::error!("transition composite without screen buffers");
        return;
    };
    let (pipeline, color) = match mask {
        Some(mask) => (
            Pipeline::VagueTransition {
                frozen: buffers.frozen,
                current: buffers.transition,
                mask,
            },
            [vague, 0.0, 0.0, progress],
        ),
        None => (
            Pipeline::AlphaTransition {
                frozen: buffers.frozen,
                current: buffers.transition,
            },
            [0.0, 0.0, 0.0, progress],
        ),
    };
    let quad = Quad {
        position: buffers.resolution.to_rect(),
        uv: full_uv(uv_flip),
        color,
    };
    let device = agent.device_mut();
    let res = device
        .begin_pass(
            RenderTarget::Texture(buffers.main),
            None,
            IntRect::from_resolution(buffers.resolution),
        )
        .and_then(|()| device.draw_quads(&pipeline, &[quad]));
    if let Err(err) = res {
        tracing::error!(%err, progress, "transition composite failed");
    }
}
