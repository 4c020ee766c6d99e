//! Logical screen to window mapping and presentation.

use std::sync::Arc;

use crate::device::{BlendType, Pipeline, Quad, RenderDevice, RenderTarget, Sampling};
use crate::foundation::core::{IntRect, OPAQUE_BLACK, Point, Resolution};
use crate::foundation::error::FramepaceResult;
use crate::present::window::WindowSurface;
use crate::render::agent::RenderAgent;
use crate::render::worker::RenderWorker;
use crate::screen::transform::full_uv;

/// UI drawn on top of the presented screen (debug overlays, menus).
pub trait PresentOverlay: Send {
    /// Draw into the open backbuffer pass.
    fn draw(&mut self, device: &mut dyn RenderDevice, window: Resolution) -> FramepaceResult<()>;
}

/// Presentation flags read every present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentSettings {
    /// Letterbox instead of stretching.
    pub keep_ratio: bool,
    /// Linear instead of nearest filtering.
    pub smooth: bool,
}

/// Where the logical screen landed in the window, for mapping pointer input back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceMapping {
    /// Viewport inside the window.
    pub viewport: IntRect,
    /// Logical resolution shown in the viewport.
    pub resolution: Resolution,
}

impl SurfaceMapping {
    /// Map a window pixel to logical screen coordinates, or `None` outside the viewport.
    pub fn window_to_logical(&self, p: Point) -> Option<Point> {
        let vp = self.viewport.to_rect();
        if vp.width() <= 0.0 || vp.height() <= 0.0 || !vp.contains(p) {
            return None;
        }
        Some(Point::new(
            (p.x - vp.x0) * f64::from(self.resolution.width) / vp.width(),
            (p.y - vp.y0) * f64::from(self.resolution.height) / vp.height(),
        ))
    }
}

/// Centered viewport preserving the aspect ratio of `logical` inside `window`.
///
/// A zero-sized (minimized) window gets an empty viewport.
pub fn letterbox(window: Resolution, logical: Resolution) -> IntRect {
    if window.width == 0 || window.height == 0 {
        return IntRect::default();
    }
    let window_ratio = window.aspect();
    let screen_ratio = logical.aspect();
    let mut width = window.width;
    let mut height = window.height;
    if screen_ratio > window_ratio {
        height = ((f64::from(width) / screen_ratio).round() as u32).clamp(1, window.height);
    } else if screen_ratio < window_ratio {
        width = ((f64::from(height) * screen_ratio).round() as u32).clamp(1, window.width);
    }
    IntRect {
        x: ((window.width - width) / 2) as i32,
        y: ((window.height - height) / 2) as i32,
        width,
        height,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ViewportKey {
    window: Resolution,
    logical: Resolution,
    keep_ratio: bool,
}

/// Logic-side half of presentation: viewport cache, swapchain tracking, input mapping.
pub struct PresentCompositor {
    window: Arc<dyn WindowSurface>,
    swapchain: Option<Resolution>,
    cached: Option<(ViewportKey, IntRect)>,
    mapping: Option<SurfaceMapping>,
}

impl PresentCompositor {
    /// Present onto `window`.
    pub fn new(window: Arc<dyn WindowSurface>) -> Self {
        Self {
            window,
            swapchain: None,
            cached: None,
            mapping: None,
        }
    }

    /// Viewport for the current window, recomputed only when an input changed.
    pub fn viewport(&mut self, logical: Resolution, keep_ratio: bool) -> IntRect {
        let key = ViewportKey {
            window: self.window.size(),
            logical,
            keep_ratio,
        };
        if let Some((cached_key, vp)) = self.cached {
            if cached_key == key {
                return vp;
            }
        }
        let vp = if keep_ratio {
            letterbox(key.window, logical)
        } else {
            IntRect::from_resolution(key.window)
        };
        tracing::debug!(?vp, w = key.window.width, h = key.window.height, "viewport updated");
        self.cached = Some((key, vp));
        vp
    }

    /// Mapping published by the last present.
    pub fn mapping(&self) -> Option<SurfaceMapping> {
        self.mapping
    }

    /// Blit the present source into the window and present. Blocks until the device presented.
    #[tracing::instrument(level = "trace", skip(self, worker))]
    pub fn present(
        &mut self,
        worker: &RenderWorker<RenderAgent>,
        logical: Resolution,
        settings: PresentSettings,
    ) -> FramepaceResult<()> {
        let window = self.window.size();
        if self.swapchain != Some(window) {
            worker.post_task(move |agent| {
                if agent.device().backbuffer_size() == window {
                    return;
                }
                if let Err(err) = agent.device_mut().resize_swapchain(window) {
                    tracing::error!(%err, "swapchain resize failed");
                }
            })?;
            self.swapchain = Some(window);
        }

        let viewport = self.viewport(logical, settings.keep_ratio);
        self.mapping = Some(SurfaceMapping {
            viewport,
            resolution: logical,
        });

        let sampling = if settings.smooth {
            Sampling::Linear
        } else {
            Sampling::Nearest
        };
        worker.post_task(move |agent| present_task(agent, window, viewport, sampling))?;
        worker.wait_synchronize()
    }
}

impl std::fmt::Debug for PresentCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentCompositor")
            .field("swapchain", &self.swapchain)
            .field("cached", &self.cached)
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}

fn present_task(agent: &mut RenderAgent, window: Resolution, viewport: IntRect, sampling: Sampling) {
    if let Err(err) = agent.device_mut().begin_pass(
        RenderTarget::Backbuffer,
        Some(OPAQUE_BLACK),
        IntRect::from_resolution(window),
    ) {
        tracing::error!(%err, "backbuffer pass failed");
        return;
    }

    if let Some(texture) = agent.present_texture() {
        let uv = full_uv(agent.device().uv_flip());
        let pipeline = Pipeline::Textured {
            texture,
            sampling,
            blend: BlendType::NoBlend,
        };
        let quad = Quad::textured(viewport.to_rect(), uv);
        if let Err(err) = agent.device_mut().draw_quads(&pipeline, &[quad]) {
            tracing::error!(%err, "screen blit failed");
        }
    }

    let mut overlay = agent.overlay.take();
    if let Some(o) = overlay.as_mut() {
        if let Err(err) = o.draw(agent.device_mut(), window) {
            tracing::warn!(%err, "present overlay failed");
        }
    }
    agent.overlay = overlay;

    if let Err(err) = agent.device_mut().present() {
        tracing::error!(%err, "present failed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/compositor.rs"]
mod tests;
