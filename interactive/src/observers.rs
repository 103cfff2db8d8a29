use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn()>;

/// Single-threaded registry of change callbacks.
///
/// [`notify`](Self::notify) calls every callback registered when it starts,
/// once each, in registration order. A callback may subscribe or unsubscribe
/// while a notification is running: new callbacks wait for the next round,
/// and removed callbacks that have not been reached yet are not called.
#[derive(Default)]
pub struct Observers {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Callback)>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    pub fn notify(&self) {
        // Snapshot so callbacks can (un)subscribe without a live borrow.
        let round: Vec<(SubscriptionId, Callback)> = self.entries.borrow().clone();
        for (id, callback) in round {
            if self.is_subscribed(id) {
                callback();
            }
        }
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.entries.borrow().iter().any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
