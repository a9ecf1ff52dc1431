//! Change notification on key-qualified channels.
//!
//! Every key has its own channel (see [`StateKey::channel`]), so a publish only
//! reaches listeners of that key. Delivery is synchronous: `publish` returns
//! after every listener has run.
//!
//! A publish made from inside a handler supersedes the one being dispatched:
//! the nested publish reaches every remaining listener first, so the outer
//! dispatch stops instead of handing them an older value.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::{StateKey, Value};

/// A change announced on a key's channel.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    pub key: StateKey,
    /// The new value. `None` means the key no longer holds a value.
    pub value: Option<Rc<Value>>,
}

/// Callback invoked for every change on a channel.
pub type Handler = Rc<dyn Fn(&ChangeEvent)>;

/// Registration handle returned by [`Notifier::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    handler: Handler,
}

/// The publish/subscribe surface of one host context.
#[derive(Default)]
pub struct Notifier {
    channels: RefCell<HashMap<String, Vec<Listener>>>,
    live: RefCell<HashSet<ListenerId>>,
    // Sequence number of the publish in progress per channel
    latest: RefCell<HashMap<String, u64>>,
    next_id: Cell<u64>,
    next_publish: Cell<u64>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on the channel for `key`.
    ///
    /// Handlers run in registration order.
    pub fn subscribe(&self, key: &StateKey, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.channels
            .borrow_mut()
            .entry(key.channel())
            .or_default()
            .push(Listener { id, handler });
        self.live.borrow_mut().insert(id);

        log::trace!("subscribed listener {:?} to '{}'", id, key.channel());
        id
    }

    /// Remove a registration. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, key: &StateKey, id: ListenerId) -> bool {
        let channel = key.channel();
        let mut channels = self.channels.borrow_mut();
        let Some(listeners) = channels.get_mut(&channel) else {
            return false;
        };

        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            channels.remove(&channel);
        }
        if removed {
            self.live.borrow_mut().remove(&id);
        }
        removed
    }

    /// Deliver a change to every listener currently registered for `key`.
    ///
    /// Dispatch walks a snapshot of the channel. A listener removed while the
    /// dispatch is running is skipped if it has not been called yet; a
    /// listener added while it is running is not called. No borrow is held
    /// while a handler runs, so handlers may publish, subscribe or
    /// unsubscribe. Dispatch stops early once a nested publish on the same
    /// key has superseded it.
    ///
    /// Returns the number of listeners called.
    pub fn publish(&self, key: &StateKey, value: Option<Rc<Value>>) -> usize {
        let channel = key.channel();
        let sequence = self.next_publish.get();
        self.next_publish.set(sequence + 1);
        self.latest.borrow_mut().insert(channel.clone(), sequence);
        let snapshot: Vec<(ListenerId, Handler)> = match self.channels.borrow().get(&channel) {
            Some(listeners) => listeners
                .iter()
                .map(|l| (l.id, Rc::clone(&l.handler)))
                .collect(),
            None => Vec::new(),
        };

        let event = ChangeEvent {
            key: key.clone(),
            value,
        };

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if self.latest.borrow().get(&channel) != Some(&sequence) {
                log::trace!("publish on '{}' superseded", channel);
                break;
            }
            if !self.live.borrow().contains(&id) {
                continue;
            }
            handler(&event);
            delivered += 1;
        }

        {
            let mut latest = self.latest.borrow_mut();
            if latest.get(&channel) == Some(&sequence) {
                latest.remove(&channel);
            }
        }

        log::trace!("published '{}' to {} listener(s)", channel, delivered);
        delivered
    }

    /// Number of listeners registered for `key`.
    pub fn listener_count(&self, key: &StateKey) -> usize {
        self.channels
            .borrow()
            .get(&key.channel())
            .map_or(0, Vec::len)
    }
}
