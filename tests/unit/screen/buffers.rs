use super::*;
use crate::device::cpu::{CpuDevice, CpuDeviceOpts};

fn cpu(memory_budget: Option<usize>) -> CpuDevice {
    CpuDevice::new(CpuDeviceOpts {
        memory_budget,
        ..CpuDeviceOpts::default()
    })
}

#[test]
fn all_three_buffers_share_the_resolution() {
    let mut d = cpu(None);
    let res = Resolution::new(32, 16);
    let m = ScreenBufferManager::new(&mut d, res).unwrap();
    for slot in BufferSlot::ALL {
        let id = m.texture(slot).unwrap();
        assert_eq!(d.texture_size(id), Some(res));
    }
    assert_eq!(d.texture_count(), 3);
    assert_eq!(m.world_transform(), WorldTransform::for_size(res, false));
}

#[test]
fn reset_replaces_every_buffer() {
    let mut d = cpu(None);
    let mut m = ScreenBufferManager::new(&mut d, Resolution::new(4, 4)).unwrap();
    let old = *m.buffers().unwrap();
    m.reset(&mut d, Resolution::new(8, 2)).unwrap();
    let new = *m.buffers().unwrap();
    for slot in BufferSlot::ALL {
        assert!(d.texture_size(old.get(slot)).is_none());
        assert_eq!(d.texture_size(new.get(slot)), Some(Resolution::new(8, 2)));
    }
    assert_eq!(m.resolution(), Resolution::new(8, 2));
    assert_eq!(d.texture_count(), 3);
}

#[test]
fn failed_reset_leaves_no_partial_set() {
    let small = Resolution::new(2, 2);
    let mut d = cpu(Some(small.byte_len() * 3));
    let mut m = ScreenBufferManager::new(&mut d, small).unwrap();
    let err = m.reset(&mut d, Resolution::new(2, 4)).unwrap_err();
    assert!(err.to_string().starts_with("resource error:"), "{err}");
    assert!(m.buffers().is_none());
    assert_eq!(d.texture_count(), 0);
}

#[test]
fn release_destroys_the_set() {
    let mut d = cpu(None);
    let mut m = ScreenBufferManager::new(&mut d, Resolution::new(2, 2)).unwrap();
    m.release(&mut d);
    assert!(m.texture(BufferSlot::Main).is_none());
    assert_eq!(d.texture_count(), 0);
}
