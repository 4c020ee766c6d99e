//! Drawable-producer contract.
//!
//! Producers (sprite batches, canvases, tilemaps) are external collaborators. Every logical frame
//! they are told `BeforeRender` (upload whatever GPU-side state the frame needs) and then
//! `OnRendering` (enqueue draw calls into the open pass). All GPU work goes through tasks posted
//! on [`RenderParams`]; producers must not keep the params past the call.

use crate::device::{Pipeline, Quad};
use crate::foundation::core::{IntRect, Point, Resolution};
use crate::foundation::error::FramepaceResult;
use crate::render::agent::{FrameTarget, RenderAgent};
use crate::render::worker::RenderWorker;
use crate::screen::transform::WorldTransform;

/// Render-phase notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPhase {
    /// Before the render pass begins.
    BeforeRender,
    /// Inside the render pass.
    OnRendering,
}

/// Per-frame information broadcast to producers.
#[derive(Clone, Copy)]
pub struct RenderParams<'a> {
    worker: &'a RenderWorker<RenderAgent>,
    /// Buffer being rendered.
    pub target: FrameTarget,
    /// Logical size of the target.
    pub screen_size: Resolution,
    /// Viewport inside the target (the whole target for screen rendering).
    pub viewport: IntRect,
    /// Origin offset of the viewport contents.
    pub origin: Point,
    /// Frame world transform; only present for [`RenderPhase::OnRendering`].
    pub world: Option<WorldTransform>,
}

impl<'a> RenderParams<'a> {
    pub(crate) fn new(
        worker: &'a RenderWorker<RenderAgent>,
        target: FrameTarget,
        screen_size: Resolution,
    ) -> Self {
        Self {
            worker,
            target,
            screen_size,
            viewport: IntRect::from_resolution(screen_size),
            origin: Point::ZERO,
            world: None,
        }
    }

    /// Post arbitrary work to the render thread, ordered with the frame's pass commands.
    pub fn post_task<F>(&self, task: F) -> FramepaceResult<()>
    where
        F: FnOnce(&mut RenderAgent) + Send + 'static,
    {
        self.worker.post_task(task)
    }

    /// Draw `quads` into the open pass.
    pub fn submit(&self, pipeline: Pipeline, quads: Vec<Quad>) -> FramepaceResult<()> {
        self.worker.post_task(move |agent| {
            if let Err(err) = agent.device_mut().draw_quads(&pipeline, &quads) {
                tracing::error!(%err, ?pipeline, "drawable submit failed");
            }
        })
    }
}

impl std::fmt::Debug for RenderParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderParams")
            .field("target", &self.target)
            .field("screen_size", &self.screen_size)
            .field("viewport", &self.viewport)
            .field("origin", &self.origin)
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

/// Something that draws into the screen every logical frame.
pub trait DrawableProducer {
    /// React to a render phase.
    fn notify(&mut self, phase: RenderPhase, params: &RenderParams<'_>) -> FramepaceResult<()>;

    /// Submit work batched outside the frame (e.g. canvas commands) before it starts.
    fn flush_pending(&mut self, _worker: &RenderWorker<RenderAgent>) -> FramepaceResult<()> {
        Ok(())
    }
}

/// Handle returned by [`DrawableController::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProducerId(u64);

/// Registered producers, notified in registration order.
#[derive(Default)]
pub struct DrawableController {
    next: u64,
    producers: Vec<(ProducerId, Box<dyn DrawableProducer>)>,
}

impl DrawableController {
    /// Register a producer.
    pub fn add(&mut self, producer: Box<dyn DrawableProducer>) -> ProducerId {
        let id = ProducerId(self.next);
        self.next += 1;
        self.producers.push((id, producer));
        id
    }

    /// Unregister a producer, handing it back.
    pub fn remove(&mut self, id: ProducerId) -> Option<Box<dyn DrawableProducer>> {
        let idx = self.producers.iter().position(|(pid, _)| *pid == id)?;
        Some(self.producers.remove(idx).1)
    }

    /// Number of registered producers.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    pub(crate) fn flush_pending(
        &mut self,
        worker: &RenderWorker<RenderAgent>,
    ) -> FramepaceResult<()> {
        for (_, p) in &mut self.producers {
            p.flush_pending(worker)?;
        }
        Ok(())
    }

    pub(crate) fn broadcast(
        &mut self,
        phase: RenderPhase,
        params: &RenderParams<'_>,
    ) -> FramepaceResult<()> {
        for (_, p) in &mut self.producers {
            p.notify(phase, params)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DrawableController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawableController")
            .field("producers", &self.producers.len())
            .finish()
    }
}
