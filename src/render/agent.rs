//! Render-thread-side resource bundle.
//!
//! Everything that touches device resources lives here and is only reachable from tasks posted
//! through the [`crate::render::worker::RenderWorker`].

use crate::device::{Quad, RenderDevice, TextureId};
use crate::foundation::core::Resolution;
use crate::foundation::error::FramepaceResult;
use crate::present::compositor::PresentOverlay;
use crate::screen::buffers::{BufferSlot, ScreenBufferManager};

/// Render target of one logical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameTarget {
    /// One of the screen buffers.
    Screen(BufferSlot),
    /// Any other texture (snapshots, exports).
    Texture(TextureId),
}

/// State owned by the render thread.
pub struct RenderAgent {
    device: Box<dyn RenderDevice>,
    screen: ScreenBufferManager,
    pub(crate) effect_quad: Option<Quad>,
    pub(crate) present_source: Option<BufferSlot>,
    pub(crate) overlay: Option<Box<dyn PresentOverlay>>,
}

impl RenderAgent {
    /// Take ownership of `device` and create the screen buffers.
    pub fn new(mut device: Box<dyn RenderDevice>, resolution: Resolution) -> FramepaceResult<Self> {
        let screen = ScreenBufferManager::new(device.as_mut(), resolution)?;
        Ok(Self {
            device,
            screen,
            effect_quad: None,
            present_source: None,
            overlay: None,
        })
    }

    /// The device.
    pub fn device(&self) -> &dyn RenderDevice {
        self.device.as_ref()
    }

    /// The device, mutably.
    pub fn device_mut(&mut self) -> &mut dyn RenderDevice {
        self.device.as_mut()
    }

    /// Screen buffers.
    pub fn screen(&self) -> &ScreenBufferManager {
        &self.screen
    }

    /// Recreate the screen buffers at `resolution`.
    pub fn reset_screen(&mut self, resolution: Resolution) -> FramepaceResult<()> {
        self.screen.reset(self.device.as_mut(), resolution)
    }

    /// Texture a frame target refers to, if it exists.
    pub fn resolve(&self, target: FrameTarget) -> Option<TextureId> {
        match target {
            FrameTarget::Screen(slot) => self.screen.texture(slot),
            FrameTarget::Texture(id) => Some(id),
        }
    }

    /// Current present source texture.
    pub fn present_texture(&self) -> Option<TextureId> {
        self.present_source.and_then(|slot| self.screen.texture(slot))
    }
}

impl Drop for RenderAgent {
    fn drop(&mut self) {
        self.screen.release(self.device.as_mut());
    }
}

impl std::fmt::Debug for RenderAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderAgent")
            .field("screen", &self.screen)
            .field("present_source", &self.present_source)
            .field("has_overlay", &self.overlay.is_some())
            .finish_non_exhaustive()
    }
}
