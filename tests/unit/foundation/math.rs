use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn unit_to_u8_clamps_and_ignores_nan() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(f32::NAN), 0);
}

#[test]
fn premultiply_scales_color_by_alpha() {
    assert_eq!(premultiply_unit([1.0, 0.0, 0.0, 1.0]), [255, 0, 0, 255]);
    assert_eq!(premultiply_unit([0.0, 0.0, 0.0, 0.5]), [0, 0, 0, 128]);
    assert_eq!(premultiply_unit([1.0, 1.0, 1.0, 0.0]), [0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = [64u8, 32, 0, 128];
    unpremultiply_in_place(&mut px);
    assert_eq!(px, [128, 64, 0, 128]);
}
