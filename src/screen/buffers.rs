//! Main / frozen / transition render targets.
//!
//! The three textures always share the logical resolution. They are created and destroyed as a
//! set; a resize never reuses any of the old textures.

use crate::device::{RenderDevice, TextureDesc, TextureId};
use crate::foundation::core::Resolution;
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::screen::transform::WorldTransform;

/// One of the three screen buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    /// Ordinary per-frame rendering and transition composites.
    Main,
    /// Snapshot taken at freeze (old scene).
    Frozen,
    /// Snapshot of the new scene at transition start.
    Transition,
}

impl BufferSlot {
    /// All slots in creation order.
    pub const ALL: [Self; 3] = [Self::Main, Self::Frozen, Self::Transition];

    fn label(self) -> &'static str {
        match self {
            Self::Main => "screen.main",
            Self::Frozen => "screen.frozen",
            Self::Transition => "screen.transition",
        }
    }
}

/// Handles of one complete buffer set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenBufferSet {
    /// Main buffer.
    pub main: TextureId,
    /// Frozen buffer.
    pub frozen: TextureId,
    /// Transition buffer.
    pub transition: TextureId,
    /// Size shared by all three.
    pub resolution: Resolution,
}

impl ScreenBufferSet {
    /// Handle for `slot`.
    pub fn get(&self, slot: BufferSlot) -> TextureId {
        match slot {
            BufferSlot::Main => self.main,
            BufferSlot::Frozen => self.frozen,
            BufferSlot::Transition => self.transition,
        }
    }
}

/// Owner of the screen buffer set and the logical world transform. Lives on the render thread.
#[derive(Debug)]
pub struct ScreenBufferManager {
    set: Option<ScreenBufferSet>,
    world: WorldTransform,
    resolution: Resolution,
}

impl ScreenBufferManager {
    /// Create the initial set.
    pub fn new(device: &mut dyn RenderDevice, resolution: Resolution) -> FramepaceResult<Self> {
        let mut mgr = Self {
            set: None,
            world: WorldTransform::for_size(resolution, device.uv_flip()),
            resolution,
        };
        mgr.reset(device, resolution)?;
        Ok(mgr)
    }

    /// Destroy the current set and create a new one at `resolution`.
    ///
    /// Failure leaves no buffers at all; callers treat it as fatal for the session.
    #[tracing::instrument(skip(self, device), fields(w = resolution.width, h = resolution.height))]
    pub fn reset(
        &mut self,
        device: &mut dyn RenderDevice,
        resolution: Resolution,
    ) -> FramepaceResult<()> {
        self.release(device);

        let mut created = Vec::with_capacity(BufferSlot::ALL.len());
        for slot in BufferSlot::ALL {
            match device.create_texture(&TextureDesc::new(resolution, slot.label())) {
                Ok(id) => created.push(id),
                Err(err) => {
                    for id in created {
                        device.destroy_texture(id);
                    }
                    tracing::error!(%err, "screen buffer creation failed");
                    return Err(FramepaceError::resource(format!(
                        "create {} ({}x{}): {err}",
                        slot.label(),
                        resolution.width,
                        resolution.height
                    )));
                }
            }
        }

        self.set = Some(ScreenBufferSet {
            main: created[0],
            frozen: created[1],
            transition: created[2],
            resolution,
        });
        self.resolution = resolution;
        self.world = WorldTransform::for_size(resolution, device.uv_flip());
        tracing::debug!("screen buffers recreated");
        Ok(())
    }

    /// Destroy all buffers.
    pub fn release(&mut self, device: &mut dyn RenderDevice) {
        if let Some(set) = self.set.take() {
            for slot in BufferSlot::ALL {
                device.destroy_texture(set.get(slot));
            }
        }
    }

    /// Current set, absent after a failed reset or a release.
    pub fn buffers(&self) -> Option<&ScreenBufferSet> {
        self.set.as_ref()
    }

    /// Handle for `slot`.
    pub fn texture(&self, slot: BufferSlot) -> Option<TextureId> {
        self.set.as_ref().map(|s| s.get(slot))
    }

    /// Logical world transform, the one every frame broadcasts to producers.
    pub fn world_transform(&self) -> WorldTransform {
        self.world
    }

    /// Logical resolution of the set.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

#[cfg(test)]
#[path = "../../tests/unit/screen/buffers.rs"]
mod tests;
