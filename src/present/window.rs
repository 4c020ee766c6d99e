use std::sync::{Arc, Mutex};

use crate::foundation::core::Resolution;

/// The physical surface the logical screen is presented on.
pub trait WindowSurface {
    /// Current drawable size in pixels.
    fn size(&self) -> Resolution;
}

/// A window that only exists as a size, for headless hosts and tests.
///
/// Clones share the size.
#[derive(Clone, Debug)]
pub struct HeadlessWindow {
    size: Arc<Mutex<Resolution>>,
}

impl HeadlessWindow {
    /// Window of `size`.
    pub fn new(size: Resolution) -> Self {
        Self {
            size: Arc::new(Mutex::new(size)),
        }
    }

    /// Simulate a user resize.
    pub fn set_size(&self, size: Resolution) {
        match self.size.lock() {
            Ok(mut g) => *g = size,
            Err(poisoned) => *poisoned.into_inner() = size,
        }
    }
}

impl WindowSurface for HeadlessWindow {
    fn size(&self) -> Resolution {
        match self.size.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
