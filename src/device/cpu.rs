//! Software reference device.
//!
//! Textures are tightly packed premultiplied RGBA8 buffers. Quads are rasterized at pixel
//! centers, one storage row per rayon task. With `uv_flip` every texture (and the backbuffer) is
//! stored bottom row first, texture coordinates have a bottom-left origin, and readback converts
//! back to top-down rows.

use rayon::prelude::*;

use crate::device::resource::ResourceTable;
use crate::device::{
    BlendType, DeviceInfo, Pipeline, Quad, RenderDevice, RenderTarget, Sampling, TextureDesc,
    TextureId,
};
use crate::effects::composite::{alpha_transition_px, over, vague_transition_px};
use crate::foundation::core::{IntRect, PremulRgba8, Resolution};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::foundation::math::premultiply_unit;

/// Options for [`CpuDevice`].
#[derive(Clone, Debug)]
pub struct CpuDeviceOpts {
    /// Initial swapchain size.
    pub window: Resolution,
    /// Bottom-left texture origin.
    pub uv_flip: bool,
    /// Maximum bytes of live texture storage; creation beyond it fails.
    pub memory_budget: Option<usize>,
}

impl Default for CpuDeviceOpts {
    fn default() -> Self {
        Self {
            window: Resolution::default(),
            uv_flip: false,
            memory_budget: None,
        }
    }
}

#[derive(Clone, Debug)]
struct CpuTexture {
    size: Resolution,
    data: Vec<u8>,
    label: String,
}

impl CpuTexture {
    fn new(size: Resolution, label: impl Into<String>) -> Self {
        Self {
            size,
            data: vec![0; size.byte_len()],
            label: label.into(),
        }
    }

    fn texel(&self, x: u32, storage_row: u32) -> PremulRgba8 {
        let idx = ((storage_row as usize) * (self.size.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    fn sample(&self, u: f64, v: f64, sampling: Sampling) -> PremulRgba8 {
        let w = self.size.width;
        let h = self.size.height;
        if w == 0 || h == 0 {
            return [0; 4];
        }
        match sampling {
            Sampling::Nearest => {
                let x = ((u * f64::from(w)).floor() as i64).clamp(0, i64::from(w) - 1) as u32;
                let y = ((v * f64::from(h)).floor() as i64).clamp(0, i64::from(h) - 1) as u32;
                self.texel(x, y)
            }
            Sampling::Linear => {
                let fx = u * f64::from(w) - 0.5;
                let fy = v * f64::from(h) - 0.5;
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = (fx - x0) as f32;
                let ty = (fy - y0) as f32;
                let cx = |x: f64| (x as i64).clamp(0, i64::from(w) - 1) as u32;
                let cy = |y: f64| (y as i64).clamp(0, i64::from(h) - 1) as u32;
                let p00 = self.texel(cx(x0), cy(y0));
                let p10 = self.texel(cx(x0 + 1.0), cy(y0));
                let p01 = self.texel(cx(x0), cy(y0 + 1.0));
                let p11 = self.texel(cx(x0 + 1.0), cy(y0 + 1.0));
                let mut out = [0u8; 4];
                for i in 0..4 {
                    let top = f32::from(p00[i]) * (1.0 - tx) + f32::from(p10[i]) * tx;
                    let bottom = f32::from(p01[i]) * (1.0 - tx) + f32::from(p11[i]) * tx;
                    out[i] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
                }
                out
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PassState {
    target: RenderTarget,
    scissor: IntRect,
}

enum Shader<'a> {
    Color {
        blend: BlendType,
    },
    Textured {
        texture: &'a CpuTexture,
        sampling: Sampling,
        blend: BlendType,
    },
    Alpha {
        frozen: &'a CpuTexture,
        current: &'a CpuTexture,
    },
    Vague {
        frozen: &'a CpuTexture,
        current: &'a CpuTexture,
        mask: &'a CpuTexture,
    },
}

/// CPU implementation of [`RenderDevice`].
#[derive(Debug)]
pub struct CpuDevice {
    opts: CpuDeviceOpts,
    textures: ResourceTable<CpuTexture>,
    backbuffer: CpuTexture,
    pass: Option<PassState>,
    presented: u64,
}

impl CpuDevice {
    /// Create a device with an empty swapchain of `opts.window` size.
    pub fn new(opts: CpuDeviceOpts) -> Self {
        let backbuffer = CpuTexture::new(opts.window, "backbuffer");
        Self {
            opts,
            textures: ResourceTable::new(),
            backbuffer,
            pass: None,
            presented: 0,
        }
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn flip_rows(&self, data: &mut [u8], size: Resolution) {
        if !self.opts.uv_flip {
            return;
        }
        let row = size.width as usize * 4;
        let h = size.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = data.split_at_mut((h - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// Bytes held by live textures, excluding the backbuffer.
    pub fn texture_bytes(&self) -> usize {
        self.textures.values().map(|t| t.data.len()).sum()
    }

    fn check_budget(&self, size: Resolution) -> FramepaceResult<()> {
        if let Some(budget) = self.opts.memory_budget {
            let needed = self.texture_bytes().saturating_add(size.byte_len());
            if needed > budget {
                return Err(FramepaceError::resource(format!(
                    "texture of {}x{} exceeds memory budget ({needed} > {budget} bytes)",
                    size.width, size.height
                )));
            }
        }
        Ok(())
    }

    fn lookup(&self, id: TextureId) -> FramepaceResult<&CpuTexture> {
        self.textures
            .get(id)
            .ok_or_else(|| FramepaceError::device(format!("unknown or busy texture {id:?}")))
    }

    fn shader(&self, pipeline: &Pipeline) -> FramepaceResult<Shader<'_>> {
        Ok(match *pipeline {
            Pipeline::Color { blend } => Shader::Color { blend },
            Pipeline::Textured {
                texture,
                sampling,
                blend,
            } => Shader::Textured {
                texture: self.lookup(texture)?,
                sampling,
                blend,
            },
            Pipeline::AlphaTransition { frozen, current } => Shader::Alpha {
                frozen: self.lookup(frozen)?,
                current: self.lookup(current)?,
            },
            Pipeline::VagueTransition {
                frozen,
                current,
                mask,
            } => Shader::Vague {
                frozen: self.lookup(frozen)?,
                current: self.lookup(current)?,
                mask: self.lookup(mask)?,
            },
        })
    }

    fn rasterize(
        &self,
        target: &mut CpuTexture,
        scissor: IntRect,
        shader: &Shader<'_>,
        quad: &Quad,
    ) {
        let size = target.size;
        let pos = quad.position.abs();
        if pos.width() <= 0.0 || pos.height() <= 0.0 {
            return;
        }

        // Pixels whose centers fall inside the quad, clipped to scissor and target.
        let x_start = span_start(pos.x0).max(i64::from(scissor.x)).max(0);
        let x_end = span_start(pos.x1)
            .min(scissor.right())
            .min(i64::from(size.width));
        let y_start = span_start(pos.y0).max(i64::from(scissor.y)).max(0);
        let y_end = span_start(pos.y1)
            .min(scissor.bottom())
            .min(i64::from(size.height));
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let solid = premultiply_unit(quad.color);
        let uv = quad.uv;
        let flip = self.opts.uv_flip;
        let row_bytes = size.width as usize * 4;
        if row_bytes == 0 {
            return;
        }

        target
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(storage_row, row)| {
                let storage_row = storage_row as i64;
                let y = if flip {
                    i64::from(size.height) - 1 - storage_row
                } else {
                    storage_row
                };
                if y < y_start || y >= y_end {
                    return;
                }
                let fy = ((y as f64 + 0.5) - pos.y0) / pos.height();
                let v = uv.y0 + fy * (uv.y1 - uv.y0);
                for x in x_start..x_end {
                    let fx = ((x as f64 + 0.5) - pos.x0) / pos.width();
                    let u = uv.x0 + fx * (uv.x1 - uv.x0);
                    let idx = x as usize * 4;
                    let dst = [row[idx], row[idx + 1], row[idx + 2], row[idx + 3]];
                    let out = shade(shader, dst, solid, quad.color, u, v);
                    row[idx..idx + 4].copy_from_slice(&out);
                }
            });
    }
}

fn span_start(edge: f64) -> i64 {
    (edge - 0.5).ceil() as i64
}

fn blend(mode: BlendType, dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match mode {
        BlendType::NoBlend => src,
        BlendType::Normal => over(dst, src, 1.0),
    }
}

fn shade(
    shader: &Shader<'_>,
    dst: PremulRgba8,
    solid: PremulRgba8,
    params: [f32; 4],
    u: f64,
    v: f64,
) -> PremulRgba8 {
    match shader {
        Shader::Color { blend: mode } => blend(*mode, dst, solid),
        Shader::Textured {
            texture,
            sampling,
            blend: mode,
        } => blend(*mode, dst, texture.sample(u, v, *sampling)),
        Shader::Alpha { frozen, current } => alpha_transition_px(
            frozen.sample(u, v, Sampling::Nearest),
            current.sample(u, v, Sampling::Nearest),
            params[3],
        ),
        Shader::Vague {
            frozen,
            current,
            mask,
        } => vague_transition_px(
            frozen.sample(u, v, Sampling::Nearest),
            current.sample(u, v, Sampling::Nearest),
            mask.sample(u, v, Sampling::Linear)[0],
            params[3],
            params[0],
        ),
    }
}

impl RenderDevice for CpuDevice {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            device: "software rasterizer".to_owned(),
            vendor: "framepace".to_owned(),
            description: format!("cpu, {} worker threads", rayon::current_num_threads()),
        }
    }

    fn uv_flip(&self) -> bool {
        self.opts.uv_flip
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> FramepaceResult<TextureId> {
        self.check_budget(desc.size)?;
        let id = self
            .textures
            .insert(CpuTexture::new(desc.size, desc.label.clone()));
        tracing::trace!(?id, label = %desc.label, w = desc.size.width, h = desc.size.height, "texture created");
        Ok(id)
    }

    fn create_texture_with_data(
        &mut self,
        desc: &TextureDesc,
        rgba: &[u8],
    ) -> FramepaceResult<TextureId> {
        if rgba.len() != desc.size.byte_len() {
            return Err(FramepaceError::device(format!(
                "texture '{}' expects {} bytes, got {}",
                desc.label,
                desc.size.byte_len(),
                rgba.len()
            )));
        }
        self.check_budget(desc.size)?;
        let mut tex = CpuTexture::new(desc.size, desc.label.clone());
        tex.data.copy_from_slice(rgba);
        self.flip_rows(&mut tex.data, desc.size);
        Ok(self.textures.insert(tex))
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if let Some(tex) = self.textures.remove(id) {
            tracing::trace!(?id, label = %tex.label, "texture destroyed");
        }
    }

    fn texture_size(&self, id: TextureId) -> Option<Resolution> {
        self.textures.get(id).map(|t| t.size)
    }

    fn read_texture(&self, id: TextureId) -> FramepaceResult<Vec<u8>> {
        let tex = self.lookup(id)?;
        let mut data = tex.data.clone();
        self.flip_rows(&mut data, tex.size);
        Ok(data)
    }

    fn begin_pass(
        &mut self,
        target: RenderTarget,
        clear: Option<PremulRgba8>,
        scissor: IntRect,
    ) -> FramepaceResult<()> {
        let surface = match target {
            RenderTarget::Texture(id) => self.textures.get_mut(id).ok_or_else(|| {
                FramepaceError::device(format!("render target {id:?} does not exist"))
            })?,
            RenderTarget::Backbuffer => &mut self.backbuffer,
        };
        if let Some(color) = clear {
            for px in surface.data.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
        self.pass = Some(PassState { target, scissor });
        Ok(())
    }

    fn draw_quads(&mut self, pipeline: &Pipeline, quads: &[Quad]) -> FramepaceResult<()> {
        let pass = self
            .pass
            .ok_or_else(|| FramepaceError::device("draw outside of a render pass"))?;

        let mut target = match pass.target {
            RenderTarget::Texture(id) => self.textures.take(id).ok_or_else(|| {
                FramepaceError::device(format!("render target {id:?} does not exist"))
            })?,
            RenderTarget::Backbuffer => {
                std::mem::replace(&mut self.backbuffer, CpuTexture::new(Resolution::new(1, 1), ""))
            }
        };

        let res = self.shader(pipeline).map(|shader| {
            for quad in quads {
                self.rasterize(&mut target, pass.scissor, &shader, quad);
            }
        });

        match pass.target {
            RenderTarget::Texture(id) => self.textures.restore(id, target),
            RenderTarget::Backbuffer => self.backbuffer = target,
        }
        res
    }

    fn backbuffer_size(&self) -> Resolution {
        self.backbuffer.size
    }

    fn resize_swapchain(&mut self, size: Resolution) -> FramepaceResult<()> {
        tracing::debug!(w = size.width, h = size.height, "swapchain resized");
        self.backbuffer = CpuTexture::new(size, "backbuffer");
        if matches!(
            self.pass,
            Some(PassState {
                target: RenderTarget::Backbuffer,
                ..
            })
        ) {
            self.pass = None;
        }
        Ok(())
    }

    fn present(&mut self) -> FramepaceResult<()> {
        self.pass = None;
        self.presented += 1;
        Ok(())
    }

    fn read_backbuffer(&self) -> FramepaceResult<Vec<u8>> {
        let mut data = self.backbuffer.data.clone();
        self.flip_rows(&mut data, self.backbuffer.size);
        Ok(data)
    }

    fn presented_frames(&self) -> u64 {
        self.presented
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/cpu.rs"]
mod tests;
