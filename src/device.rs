//! Opaque command-submission target.
//!
//! Everything the core needs from a graphics device: render-target textures, one render pass at
//! a time, axis-aligned textured/colored quads with a handful of fixed pipelines, and a
//! presentable swapchain. Devices live on the render thread and are only reached through posted
//! tasks.

pub(crate) mod cpu;
pub(crate) mod resource;

use crate::foundation::core::{IntRect, PremulRgba8, Rect, Resolution};
use crate::foundation::error::FramepaceResult;

pub use resource::TextureId;

/// Renderer identification strings reported to the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device or adapter name.
    pub device: String,
    /// Vendor name.
    pub vendor: String,
    /// Free-form description (driver, API version).
    pub description: String,
}

/// Texture creation parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureDesc {
    /// Pixel size.
    pub size: Resolution,
    /// Debug label.
    pub label: String,
}

impl TextureDesc {
    /// Describe a render-target texture.
    pub fn new(size: Resolution, label: impl Into<String>) -> Self {
        Self {
            size,
            label: label.into(),
        }
    }
}

/// Where a render pass writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// An offscreen texture.
    Texture(TextureId),
    /// The swapchain backbuffer.
    Backbuffer,
}

/// Fixed-function blend state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendType {
    /// Overwrite the destination.
    NoBlend,
    /// Premultiplied source-over.
    #[default]
    Normal,
}

/// Texture filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sampling {
    /// Point sampling.
    #[default]
    Nearest,
    /// Bilinear filtering.
    Linear,
}

/// Pipeline bound for a batch of quads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pipeline {
    /// Solid color from the quad's color.
    Color {
        /// Blend state.
        blend: BlendType,
    },
    /// Sample one texture.
    Textured {
        /// Sampled texture.
        texture: TextureId,
        /// Filtering.
        sampling: Sampling,
        /// Blend state.
        blend: BlendType,
    },
    /// `lerp(frozen, current, progress)` with progress in the quad color's alpha.
    AlphaTransition {
        /// Old scene.
        frozen: TextureId,
        /// New scene.
        current: TextureId,
    },
    /// Mask-driven wipe; vague width in the quad color's red, progress in its alpha.
    VagueTransition {
        /// Old scene.
        frozen: TextureId,
        /// New scene.
        current: TextureId,
        /// Single-channel (red) mask.
        mask: TextureId,
    },
}

/// Axis-aligned quad in target pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Covered region in target pixels, top-left origin.
    pub position: Rect,
    /// Texture coordinates at `position`'s corners; `y0 > y1` flips vertically.
    pub uv: Rect,
    /// Straight-alpha color (or pipeline parameters).
    pub color: [f32; 4],
}

impl Quad {
    /// Solid-colored quad.
    pub fn solid(position: Rect, color: [f32; 4]) -> Self {
        Self {
            position,
            uv: Rect::new(0.0, 0.0, 1.0, 1.0),
            color,
        }
    }

    /// Quad sampling `uv`, unmodulated.
    pub fn textured(position: Rect, uv: Rect) -> Self {
        Self {
            position,
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Graphics device as consumed by the core.
pub trait RenderDevice: Send {
    /// Renderer identification.
    fn info(&self) -> DeviceInfo;

    /// `true` when textures have a bottom-left origin.
    fn uv_flip(&self) -> bool;

    /// Allocate a render-target texture cleared to transparent black.
    fn create_texture(&mut self, desc: &TextureDesc) -> FramepaceResult<TextureId>;

    /// Allocate a texture from top-down premultiplied RGBA8 rows.
    fn create_texture_with_data(
        &mut self,
        desc: &TextureDesc,
        rgba: &[u8],
    ) -> FramepaceResult<TextureId>;

    /// Free a texture. Unknown handles are ignored.
    fn destroy_texture(&mut self, id: TextureId);

    /// Size of a live texture.
    fn texture_size(&self, id: TextureId) -> Option<Resolution>;

    /// Read a texture back as top-down premultiplied RGBA8 rows.
    fn read_texture(&self, id: TextureId) -> FramepaceResult<Vec<u8>>;

    /// Begin a render pass, optionally clearing the whole target first.
    fn begin_pass(
        &mut self,
        target: RenderTarget,
        clear: Option<PremulRgba8>,
        scissor: IntRect,
    ) -> FramepaceResult<()>;

    /// Draw quads into the current pass.
    fn draw_quads(&mut self, pipeline: &Pipeline, quads: &[Quad]) -> FramepaceResult<()>;

    /// Current swapchain size.
    fn backbuffer_size(&self) -> Resolution;

    /// Recreate the swapchain at `size`.
    fn resize_swapchain(&mut self, size: Resolution) -> FramepaceResult<()>;

    /// Show the backbuffer and end the current pass.
    fn present(&mut self) -> FramepaceResult<()>;

    /// Read the backbuffer as top-down premultiplied RGBA8 rows.
    fn read_backbuffer(&self) -> FramepaceResult<Vec<u8>>;

    /// Number of completed presents.
    fn presented_frames(&self) -> u64;
}
