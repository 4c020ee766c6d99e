//! Per-frame tick observers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Box<dyn FnMut()>;

#[derive(Default)]
struct Inner {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
    notifying: bool,
    removed: Vec<u64>,
}

/// Callbacks run once per logical frame on the logic side, after the frame's pass is encoded.
///
/// Callbacks may add or drop subscriptions while being notified; additions take effect from
/// the next frame.
#[derive(Clone, Default)]
pub struct TickObservers {
    inner: Rc<RefCell<Inner>>,
}

/// Keeps a tick callback registered. Dropping it unsubscribes.
#[must_use = "dropping the subscription unregisters the callback"]
pub struct TickSubscription {
    id: u64,
    inner: Weak<RefCell<Inner>>,
}

impl TickObservers {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`.
    pub fn add(&self, callback: impl FnMut() + 'static) -> TickSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Box::new(callback)));
        TickSubscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// `true` when no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every callback once.
    pub fn notify(&self) {
        let mut running = {
            let mut inner = self.inner.borrow_mut();
            inner.notifying = true;
            std::mem::take(&mut inner.entries)
        };

        for (_, callback) in &mut running {
            callback();
        }

        let removed = {
            let mut inner = self.inner.borrow_mut();
            inner.notifying = false;
            std::mem::take(&mut inner.removed)
        };
        let (keep, gone): (Vec<_>, Vec<_>) = running
            .into_iter()
            .partition(|(id, _)| !removed.contains(id));
        {
            let mut inner = self.inner.borrow_mut();
            let added = std::mem::replace(&mut inner.entries, keep);
            inner.entries.extend(added);
        }
        // Dropped callbacks may own subscriptions themselves.
        drop(gone);
    }
}

impl std::fmt::Debug for TickObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickObservers")
            .field("len", &self.len())
            .finish()
    }
}

impl TickSubscription {
    /// Keep the callback registered for the lifetime of the observer list.
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let id = self.id;
        let gone = {
            let mut inner = inner.borrow_mut();
            if inner.notifying {
                inner.removed.push(id);
            }
            let pos = inner.entries.iter().position(|(i, _)| *i == id);
            pos.map(|p| inner.entries.remove(p))
        };
        drop(gone);
    }
}

impl std::fmt::Debug for TickSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TickSubscription").field(&self.id).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/tick.rs"]
mod tests;
