//! Per-pixel kernels on premultiplied RGBA8.

use crate::foundation::core::PremulRgba8;
use crate::foundation::math::mul_div255_u8;

/// Source-over with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// `a * (1 - t) + b * t`, with `t` quantized to 1/255 steps. `t == 0` returns `a` exactly.
pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    if tt == 0 {
        return a;
    }
    if tt == 255 {
        return b;
    }
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

/// Blend factor of the masked wipe.
///
/// The mask sample is clamped into the moving band `[progress, progress + vague]` and
/// normalized by the band width, so 0 means "new scene" and 1 means "old scene".
pub fn vague_mix_alpha(sample: f32, progress: f32, vague: f32) -> f32 {
    let vague = if vague.is_finite() && vague > 0.0 {
        vague
    } else {
        1.0 / 255.0
    };
    let clamped = sample.clamp(progress, progress + vague);
    ((clamped - progress) / vague).clamp(0.0, 1.0)
}

/// Plain cross-dissolve pixel: `lerp(frozen, current, progress)`.
pub fn alpha_transition_px(
    frozen: PremulRgba8,
    current: PremulRgba8,
    progress: f32,
) -> PremulRgba8 {
    crossfade(frozen, current, progress)
}

/// Masked wipe pixel: `lerp(current, frozen, mix)` where `mix` comes from the red mask sample.
pub fn vague_transition_px(
    frozen: PremulRgba8,
    current: PremulRgba8,
    mask_red: u8,
    progress: f32,
    vague: f32,
) -> PremulRgba8 {
    let mix = vague_mix_alpha(f32::from(mask_red) / 255.0, progress, vague);
    crossfade(current, frozen, mix)
}

/// Darken one pixel as the black brightness overlay does.
pub fn brightness_overlay(px: PremulRgba8, brightness: u8) -> PremulRgba8 {
    if brightness == 255 {
        return px;
    }
    over(px, [0, 0, 0, 255], f32::from(255 - brightness) / 255.0)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
