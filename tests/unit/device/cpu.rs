use super::*;
use crate::foundation::core::{OPAQUE_BLACK, Rect};

fn device(uv_flip: bool) -> CpuDevice {
    CpuDevice::new(CpuDeviceOpts {
        window: Resolution::new(8, 8),
        uv_flip,
        memory_budget: None,
    })
}

fn px(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

fn full_uv(flip: bool) -> Rect {
    if flip {
        Rect::new(0.0, 1.0, 1.0, 0.0)
    } else {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }
}

#[test]
fn new_textures_are_transparent() {
    let mut d = device(false);
    let id = d.create_texture(&TextureDesc::new(Resolution::new(2, 2), "t")).unwrap();
    assert_eq!(d.read_texture(id).unwrap(), vec![0; 16]);
    assert_eq!(d.texture_size(id), Some(Resolution::new(2, 2)));
}

#[test]
fn clear_then_solid_quad_respects_scissor() {
    for flip in [false, true] {
        let mut d = device(flip);
        let size = Resolution::new(4, 4);
        let id = d.create_texture(&TextureDesc::new(size, "t")).unwrap();
        let scissor = IntRect {
            x: 0,
            y: 0,
            width: 4,
            height: 2,
        };
        d.begin_pass(RenderTarget::Texture(id), Some(OPAQUE_BLACK), scissor)
            .unwrap();
        d.draw_quads(
            &Pipeline::Color {
                blend: BlendType::Normal,
            },
            &[Quad::solid(size.to_rect(), [1.0, 0.0, 0.0, 1.0])],
        )
        .unwrap();
        let data = d.read_texture(id).unwrap();
        assert_eq!(px(&data, 4, 0, 0), [255, 0, 0, 255], "flip={flip}");
        assert_eq!(px(&data, 4, 3, 1), [255, 0, 0, 255], "flip={flip}");
        assert_eq!(px(&data, 4, 0, 2), OPAQUE_BLACK, "flip={flip}");
        assert_eq!(px(&data, 4, 3, 3), OPAQUE_BLACK, "flip={flip}");
    }
}

#[test]
fn textured_copy_preserves_orientation() {
    for flip in [false, true] {
        let mut d = device(flip);
        let size = Resolution::new(2, 2);
        let mut rgba = vec![0u8; 16];
        rgba[..4].copy_from_slice(&[255, 0, 0, 255]);
        rgba[12..].copy_from_slice(&[0, 0, 255, 255]);
        let src = d
            .create_texture_with_data(&TextureDesc::new(size, "src"), &rgba)
            .unwrap();
        assert_eq!(d.read_texture(src).unwrap(), rgba);

        let dst = d.create_texture(&TextureDesc::new(size, "dst")).unwrap();
        d.begin_pass(
            RenderTarget::Texture(dst),
            Some(OPAQUE_BLACK),
            IntRect::from_resolution(size),
        )
        .unwrap();
        d.draw_quads(
            &Pipeline::Textured {
                texture: src,
                sampling: Sampling::Nearest,
                blend: BlendType::NoBlend,
            },
            &[Quad::textured(size.to_rect(), full_uv(flip))],
        )
        .unwrap();
        assert_eq!(d.read_texture(dst).unwrap(), rgba, "flip={flip}");
    }
}

#[test]
fn alpha_transition_at_zero_progress_is_frozen() {
    let mut d = device(false);
    let size = Resolution::new(2, 1);
    let frozen_px = vec![10, 20, 30, 255, 40, 50, 60, 255];
    let frozen = d
        .create_texture_with_data(&TextureDesc::new(size, "frozen"), &frozen_px)
        .unwrap();
    let current = d
        .create_texture_with_data(&TextureDesc::new(size, "current"), &[200; 8])
        .unwrap();
    let main = d.create_texture(&TextureDesc::new(size, "main")).unwrap();
    d.begin_pass(RenderTarget::Texture(main), None, IntRect::from_resolution(size))
        .unwrap();
    d.draw_quads(
        &Pipeline::AlphaTransition { frozen, current },
        &[Quad {
            position: size.to_rect(),
            uv: full_uv(false),
            color: [1.0, 1.0, 1.0, 0.0],
        }],
    )
    .unwrap();
    assert_eq!(d.read_texture(main).unwrap(), frozen_px);
}

#[test]
fn draw_without_pass_is_an_error() {
    let mut d = device(false);
    let err = d
        .draw_quads(
            &Pipeline::Color {
                blend: BlendType::Normal,
            },
            &[],
        )
        .unwrap_err();
    assert!(err.to_string().starts_with("device error:"), "{err}");
}

#[test]
fn destroyed_texture_cannot_be_sampled() {
    let mut d = device(false);
    let size = Resolution::new(1, 1);
    let src = d.create_texture(&TextureDesc::new(size, "src")).unwrap();
    d.destroy_texture(src);
    assert!(d.read_texture(src).is_err());
    d.begin_pass(RenderTarget::Backbuffer, Some(OPAQUE_BLACK), IntRect::from_resolution(size))
        .unwrap();
    let err = d
        .draw_quads(
            &Pipeline::Textured {
                texture: src,
                sampling: Sampling::Linear,
                blend: BlendType::Normal,
            },
            &[Quad::textured(size.to_rect(), full_uv(false))],
        )
        .unwrap_err();
    assert!(err.to_string().contains("unknown or busy texture"), "{err}");
}

#[test]
fn memory_budget_is_enforced() {
    let mut d = CpuDevice::new(CpuDeviceOpts {
        memory_budget: Some(16),
        ..CpuDeviceOpts::default()
    });
    let desc = TextureDesc::new(Resolution::new(2, 1), "t");
    let a = d.create_texture(&desc).unwrap();
    d.create_texture(&desc).unwrap();
    assert_eq!(d.texture_bytes(), 16);
    let err = d.create_texture(&desc).unwrap_err();
    assert!(err.to_string().starts_with("resource error:"), "{err}");
    d.destroy_texture(a);
    assert!(d.create_texture(&desc).is_ok());
    assert_eq!(d.texture_count(), 2);
}

#[test]
fn present_counts_and_resize_replaces_backbuffer() {
    let mut d = device(false);
    d.begin_pass(RenderTarget::Backbuffer, Some(OPAQUE_BLACK), IntRect::from_resolution(Resolution::new(8, 8)))
        .unwrap();
    d.present().unwrap();
    assert_eq!(d.presented_frames(), 1);
    assert_eq!(px(&d.read_backbuffer().unwrap(), 8, 7, 7), OPAQUE_BLACK);
    d.resize_swapchain(Resolution::new(3, 2)).unwrap();
    assert_eq!(d.backbuffer_size(), Resolution::new(3, 2));
    assert_eq!(d.read_backbuffer().unwrap().len(), 24);
}

#[test]
fn info_names_the_software_device() {
    let d = device(false);
    let info = d.info();
    assert_eq!(info.vendor, "framepace");
    assert!(!info.device.is_empty());
}
