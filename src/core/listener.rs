//! Listener registry and subscription handles.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) type Callback = Rc<dyn Fn()>;

struct Entry {
    id: u64,
    callback: Callback,
    active: Rc<Cell<bool>>,
}

/// Registered listeners in registration order.
///
/// Each registration is its own entry, so the same callback may be
/// registered twice and removed independently.
#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: u64,
    entries: Vec<Entry>,
}

impl ListenerSet {
    pub(crate) fn insert(&mut self, callback: Callback) -> (u64, Rc<Cell<bool>>) {
        let id = self.next_id;
        self.next_id += 1;
        let active = Rc::new(Cell::new(true));
        self.entries.push(Entry {
            id,
            callback,
            active: Rc::clone(&active),
        });
        (id, active)
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Listeners registered at this instant, with their liveness flags.
    ///
    /// A notification round iterates the snapshot and consults the flag
    /// before each call, so listeners removed mid-round are skipped while
    /// listeners added mid-round wait for the next round.
    pub(crate) fn snapshot(&self) -> Vec<(Rc<Cell<bool>>, Callback)> {
        self.entries
            .iter()
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.callback)))
            .collect()
    }
}

/// Handle returned by `subscribe`; the only way to remove the listener.
///
/// Dropping the handle leaves the listener registered. Calling
/// [`Subscription::unsubscribe`] more than once is a no-op.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
    listeners: Weak<RefCell<ListenerSet>>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        active: Rc<Cell<bool>>,
        listeners: Weak<RefCell<ListenerSet>>,
    ) -> Self {
        Self {
            id,
            active,
            listeners,
        }
    }

    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
