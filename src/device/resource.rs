//! Generation-counted handle table for device resources.

/// Handle to a texture owned by a device.
///
/// A slot index plus the generation the slot had when the texture was created. Destroying the
/// texture bumps the generation, so stale handles resolve to nothing instead of aliasing a newer
/// texture in the same slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId {
    index: u32,
    generation: u32,
}

impl TextureId {
    /// Slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at creation time.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Debug for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TextureId({}v{})", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
    taken: bool,
}

/// Slot storage addressed by [`TextureId`].
#[derive(Debug)]
pub struct ResourceTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for ResourceTable<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T> ResourceTable<T> {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, reusing a freed slot when one exists.
    pub fn insert(&mut self, value: T) -> TextureId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            slot.taken = false;
            return TextureId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
            taken: false,
        });
        TextureId {
            index,
            generation: 0,
        }
    }

    fn slot(&self, id: TextureId) -> Option<&Slot<T>> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
    }

    fn slot_mut(&mut self, id: TextureId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
    }

    /// Borrow a live resource.
    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.slot(id).and_then(|s| s.value.as_ref())
    }

    /// Mutably borrow a live resource.
    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut T> {
        self.slot_mut(id).and_then(|s| s.value.as_mut())
    }

    /// Remove a resource and invalidate every handle to it.
    pub fn remove(&mut self, id: TextureId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        if slot.value.is_none() && !slot.taken {
            return None;
        }
        let value = slot.value.take();
        slot.taken = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        value
    }

    /// Temporarily move a resource out while keeping its slot reserved.
    pub fn take(&mut self, id: TextureId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take()?;
        slot.taken = true;
        Some(value)
    }

    /// Put back a resource moved out by [`ResourceTable::take`].
    pub fn restore(&mut self, id: TextureId, value: T) {
        if let Some(slot) = self.slot_mut(id) {
            if slot.taken {
                slot.value = Some(value);
                slot.taken = false;
            }
        }
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Iterate live resources.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.value.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/resource.rs"]
mod tests;
