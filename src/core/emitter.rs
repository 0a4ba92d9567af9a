//! Event channel that decouples a preview from its host.
//!
//! Emission snapshots the matching listeners before invoking them, so listeners may
//! subscribe, unsubscribe, or call back into the emitting preview while an event is in flight.
//! Events emitted from inside a listener are queued and delivered in order by the outermost
//! `emit` once the running listener returns.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::event::{EventKind, PreviewEvent};

type Listener = Rc<RefCell<dyn FnMut(&PreviewEvent)>>;

/// Stable identifier for a listener registered on a single channel.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

struct ListenerEntry {
    id: ListenerId,
    kind: Option<EventKind>,
    listener: Listener,
}

#[derive(Default)]
pub struct EventChannel {
    listeners: RefCell<Vec<ListenerEntry>>,
    next_id: Cell<u64>,
    queue: RefCell<VecDeque<PreviewEvent>>,
    delivering: Cell<bool>,
    clear_after_delivery: Cell<bool>,
}

/// Resets the delivery flag even when a listener unwinds.
struct DeliveryGuard<'a> {
    channel: &'a EventChannel,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.channel.delivering.set(false);
        if self.channel.clear_after_delivery.replace(false) {
            self.channel.queue.borrow_mut().clear();
            let released = std::mem::take(&mut *self.channel.listeners.borrow_mut());
            drop(released);
        }
    }
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one kind of event.
    pub fn on(&self, kind: EventKind, listener: impl FnMut(&PreviewEvent) + 'static) -> ListenerId {
        self.insert(Some(kind), Rc::new(RefCell::new(listener)))
    }

    /// Subscribes to every event.
    pub fn on_any(&self, listener: impl FnMut(&PreviewEvent) + 'static) -> ListenerId {
        self.insert(None, Rc::new(RefCell::new(listener)))
    }

    /// Removes a listener. Returns `false` when the id is unknown.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    /// Drops every listener. During delivery this takes effect once the queued events
    /// have been delivered.
    pub fn clear(&self) {
        if self.delivering.get() {
            self.clear_after_delivery.set(true);
            return;
        }
        self.listeners.borrow_mut().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn emit(&self, event: &PreviewEvent) {
        self.queue.borrow_mut().push_back(event.clone());
        if self.delivering.replace(true) {
            tracing::trace!(kind = ?event.kind(), "event queued behind running listener");
            return;
        }

        let _guard = DeliveryGuard { channel: self };
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.deliver(&event);
        }
    }

    fn deliver(&self, event: &PreviewEvent) {
        let kind = event.kind();
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind.map_or(true, |wanted| wanted == kind))
            .map(|entry| Rc::clone(&entry.listener))
            .collect();

        for listener in matching {
            (&mut *listener.borrow_mut())(event);
        }
    }

    fn insert(&self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push(ListenerEntry { id, kind, listener });
        id
    }
}
