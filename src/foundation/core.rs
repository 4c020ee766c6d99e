pub use kurbo::{Affine, Point, Rect, Size};

/// Premultiplied RGBA8 pixel (r, g, b already multiplied by a).
pub type PremulRgba8 = [u8; 4];

/// Opaque black, the clear color of every render pass.
pub const OPAQUE_BLACK: PremulRgba8 = [0, 0, 0, 255];

/// Pixel dimensions of a buffer or surface.
///
/// Both axes are at least 1; zero inputs are clamped rather than rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a resolution, clamping each axis to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        self.pixel_count().saturating_mul(4)
    }

    /// Full-size rectangle at the origin, in float pixel space.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Size as a kurbo [`Size`].
    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Integer pixel rectangle used for viewports and scissors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl IntRect {
    /// Rectangle covering `size` at the origin.
    pub fn from_resolution(size: Resolution) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Float pixel-space rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

/// Global screen brightness, 0 (black) to 255 (unmodified).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Unmodified output.
    pub const FULL: Self = Self(255);
    /// Fully faded to black.
    pub const BLACK: Self = Self(0);

    /// Clamp an arbitrary integer into `[0, 255]`.
    pub fn clamped(value: u32) -> Self {
        Self(value.min(255) as u8)
    }

    /// Clamp and truncate a float level, matching integer assignment semantics.
    pub fn from_level(level: f32) -> Self {
        if !level.is_finite() {
            return Self::FULL;
        }
        Self(level.clamp(0.0, 255.0) as u8)
    }

    /// Raw value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// `true` when no post-pass overlay is needed.
    pub fn is_full(self) -> bool {
        self.0 == 255
    }

    /// Alpha of the black overlay quad: `(255 - brightness) / 255`.
    pub fn overlay_alpha(self) -> f32 {
        f32::from(255 - self.0) / 255.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::FULL
    }
}

/// A frame read back from the device as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to a straight-alpha [`image::RgbaImage`].
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            crate::foundation::math::unpremultiply_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
