//! Per-frame render sequence.
//!
//! 1. flush producer batches
//! 2. broadcast `BeforeRender`
//! 3. begin the pass: bind, clear to opaque black, scissor to target, prepare brightness quad
//! 4. broadcast `OnRendering` with the world transform
//! 5. end the pass: draw the brightness quad over the scene
//!
//! Steps 3 and 5 (and whatever producers post in between) run as ordered tasks on the render
//! thread.

use crate::device::{BlendType, Pipeline, Quad, RenderTarget};
use crate::foundation::core::{Brightness, IntRect, OPAQUE_BLACK, Resolution};
use crate::foundation::error::FramepaceResult;
use crate::pipeline::drawable::{DrawableController, RenderParams, RenderPhase};
use crate::render::agent::{FrameTarget, RenderAgent};
use crate::render::worker::RenderWorker;
use crate::screen::transform::WorldTransform;

/// Inputs of one logical frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameRequest {
    pub(crate) target: FrameTarget,
    pub(crate) resolution: Resolution,
    pub(crate) world: WorldTransform,
    pub(crate) brightness: Brightness,
}

#[tracing::instrument(level = "trace", skip(worker, drawables))]
pub(crate) fn render_frame(
    worker: &RenderWorker<RenderAgent>,
    drawables: &mut DrawableController,
    req: FrameRequest,
) -> FramepaceResult<()> {
    drawables.flush_pending(worker)?;

    let mut params = RenderParams::new(worker, req.target, req.resolution);
    drawables.broadcast(RenderPhase::BeforeRender, &params)?;

    let target = req.target;
    let brightness = req.brightness;
    worker.post_task(move |agent| begin_pass(agent, target, brightness))?;

    params.world = Some(req.world);
    drawables.broadcast(RenderPhase::OnRendering, &params)?;

    worker.post_task(end_pass)
}

fn begin_pass(agent: &mut RenderAgent, target: FrameTarget, brightness: Brightness) {
    let Some(id) = agent.resolve(target) else {
        tracing::error!(?target, "frame target has no texture");
        return;
    };
    let Some(size) = agent.device().texture_size(id) else {
        tracing::error!(?target, ?id, "frame target texture is gone");
        return;
    };

    agent.effect_quad = (!brightness.is_full())
        .then(|| Quad::solid(size.to_rect(), [0.0, 0.0, 0.0, brightness.overlay_alpha()]));

    if let Err(err) = agent.device_mut().begin_pass(
        RenderTarget::Texture(id),
        Some(OPAQUE_BLACK),
        IntRect::from_resolution(size),
    ) {
        tracing::error!(%err, "begin render pass failed");
    }
}

fn end_pass(agent: &mut RenderAgent) {
    let Some(quad) = agent.effect_quad.take() else {
        return;
    };
    let pipeline = Pipeline::Color {
        blend: BlendType::Normal,
    };
    if let Err(err) = agent.device_mut().draw_quads(&pipeline, &[quad]) {
        tracing::error!(%err, "brightness overlay failed");
    }
}
