use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([10, 20, 30, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn over_zero_opacity_keeps_dst() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
}

#[test]
fn crossfade_endpoints_are_exact() {
    let a = [12, 34, 56, 78];
    let b = [200, 150, 100, 250];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
    assert_eq!(crossfade(a, b, f32::NAN), a);
}

#[test]
fn crossfade_midpoint_is_halfway() {
    let out = crossfade([0, 0, 0, 255], [254, 254, 254, 255], 0.5);
    for c in &out[..3] {
        assert!((126..=128).contains(c), "{out:?}");
    }
    assert_eq!(out[3], 255);
}

#[test]
fn vague_mix_is_half_at_band_center() {
    let progress = 0.25;
    let vague = 0.5;
    let mix = vague_mix_alpha(progress + vague / 2.0, progress, vague);
    assert!((mix - 0.5).abs() < 1e-6, "{mix}");
}

#[test]
fn vague_mix_saturates_outside_band() {
    assert_eq!(vague_mix_alpha(0.0, 0.4, 0.1), 0.0);
    assert!((vague_mix_alpha(1.0, 0.4, 0.1) - 1.0).abs() < 1e-5);
}

#[test]
fn vague_pixel_below_band_shows_current() {
    let frozen = [255, 0, 0, 255];
    let current = [0, 0, 255, 255];
    assert_eq!(vague_transition_px(frozen, current, 0, 0.5, 0.1), current);
    assert_eq!(vague_transition_px(frozen, current, 255, 0.5, 0.1), frozen);
}

#[test]
fn alpha_pixel_at_zero_progress_is_frozen() {
    let frozen = [9, 8, 7, 255];
    assert_eq!(alpha_transition_px(frozen, [100, 100, 100, 255], 0.0), frozen);
}

#[test]
fn brightness_overlay_endpoints() {
    let px = [200, 100, 50, 255];
    assert_eq!(brightness_overlay(px, 255), px);
    assert_eq!(brightness_overlay(px, 0), [0, 0, 0, 255]);
}
