use crate::foundation::core::{Affine, Point, Rect, Resolution};

/// Projection + world transform uniform handed to drawable producers.
///
/// `projection` maps target pixels (top-left origin, +y down) to clip space. Row-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform {
    /// Pixel to clip-space projection.
    pub projection: [[f32; 4]; 4],
    /// Model transform; always identity for screen-space rendering.
    pub transform: [[f32; 4]; 4],
}

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl WorldTransform {
    /// Orthographic projection for a target of `size` pixels.
    ///
    /// With `uv_flip` the vertical axis is mirrored so rendering into a bottom-left-origin
    /// target keeps the top of the logical image at the top of the stored texture.
    pub fn for_size(size: Resolution, uv_flip: bool) -> Self {
        let w = size.width.max(1) as f32;
        let h = size.height.max(1) as f32;
        let y_row = if uv_flip {
            [0.0, 2.0 / h, 0.0, -1.0]
        } else {
            [0.0, -2.0 / h, 0.0, 1.0]
        };
        Self {
            projection: [
                [2.0 / w, 0.0, 0.0, -1.0],
                y_row,
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            transform: IDENTITY,
        }
    }

    /// Project a pixel-space point into clip space.
    pub fn project(&self, p: Point) -> Point {
        let m = &self.projection;
        let x = p.x as f32;
        let y = p.y as f32;
        Point::new(
            f64::from(m[0][0] * x + m[0][1] * y + m[0][3]),
            f64::from(m[1][0] * x + m[1][1] * y + m[1][3]),
        )
    }

    /// The 2D part of the projection as a kurbo [`Affine`].
    pub fn to_affine(&self) -> Affine {
        let m = &self.projection;
        Affine::new([
            f64::from(m[0][0]),
            f64::from(m[1][0]),
            f64::from(m[0][1]),
            f64::from(m[1][1]),
            f64::from(m[0][3]),
            f64::from(m[1][3]),
        ])
    }
}

/// Texture coordinates covering a whole texture in the device's orientation.
pub fn full_uv(uv_flip: bool) -> Rect {
    if uv_flip {
        Rect::new(0.0, 1.0, 1.0, 0.0)
    } else {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/screen/transform.rs"]
mod tests;
