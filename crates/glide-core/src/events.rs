//! Lifecycle events and a minimal publish/subscribe bus.
//!
//! An [`Animation`](crate::Animation) owns one `EventBus` and emits two
//! events on it: [`LifecycleEvent::Start`] at the beginning of a commit and
//! [`LifecycleEvent::End`] once the transition duration has elapsed.
//!
//! Listeners are append-only and run in registration order. A listener
//! registered while its own event is being emitted is kept for later
//! emissions but does not run in the current pass.
//!
//! # Usage
//!
//! ```
//! use glide_core::events::{EventBus, LifecycleEvent};
//!
//! let mut bus: EventBus<u32> = EventBus::new();
//! bus.on(LifecycleEvent::End, |n: &u32| assert_eq!(*n, 7));
//! bus.emit(LifecycleEvent::End, &7);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named events emitted by an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A commit has begun; pending state may still be rewritten.
    Start,
    /// The transition duration has elapsed.
    End,
}

impl LifecycleEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A listener invoked with the emitter's payload.
pub type Listener<A> = Box<dyn FnMut(&A)>;

/// Event name -> ordered listeners.
pub struct EventBus<A> {
    listeners: HashMap<LifecycleEvent, Vec<Listener<A>>>,
}

impl<A> Default for EventBus<A> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<A> fmt::Debug for EventBus<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .listeners
            .iter()
            .map(|(event, list)| (event.name(), list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl<A> EventBus<A> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the listeners of `event`.
    pub fn on(&mut self, event: LifecycleEvent, listener: impl FnMut(&A) + 'static) -> &mut Self {
        self.listeners
            .entry(event)
            .or_default()
            .push(Box::new(listener));
        self
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: LifecycleEvent) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    /// Run every listener of `event` with `payload`.
    pub fn emit(&mut self, event: LifecycleEvent, payload: &A) {
        if let Some(listeners) = self.listeners.get_mut(&event) {
            for listener in listeners.iter_mut() {
                listener(payload);
            }
        }
    }

    /// Take the listeners of `event` out of the bus so they can run while the
    /// bus itself is borrowed elsewhere. Pair with [`restore`](Self::restore).
    pub(crate) fn detach(&mut self, event: LifecycleEvent) -> Vec<Listener<A>> {
        self.listeners.remove(&event).unwrap_or_default()
    }

    /// Put detached listeners back in front of any registered in the meantime.
    pub(crate) fn restore(&mut self, event: LifecycleEvent, mut listeners: Vec<Listener<A>>) {
        let added = self.listeners.remove(&event).unwrap_or_default();
        listeners.extend(added);
        if !listeners.is_empty() {
            self.listeners.insert(event, listeners);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_names() {
        assert_eq!(LifecycleEvent::Start.to_string(), "start");
        assert_eq!(LifecycleEvent::End.name(), "end");
    }

    #[test]
    fn test_listeners_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<u32> = EventBus::new();

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            bus.on(LifecycleEvent::Start, move |n: &u32| {
                log.borrow_mut().push(format!("{tag}{n}"));
            });
        }

        bus.emit(LifecycleEvent::Start, &1);
        bus.emit(LifecycleEvent::End, &2);
        bus.emit(LifecycleEvent::Start, &3);

        assert_eq!(*log.borrow(), ["a1", "b1", "c1", "a3", "b3", "c3"]);
        assert_eq!(bus.listener_count(LifecycleEvent::Start), 3);
        assert_eq!(bus.listener_count(LifecycleEvent::End), 0);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let mut bus: EventBus<()> = EventBus::new();
        bus.emit(LifecycleEvent::End, &());
        assert_eq!(bus.listener_count(LifecycleEvent::End), 0);
    }

    #[test]
    fn test_restore_keeps_detached_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<()> = EventBus::new();

        let first = log.clone();
        bus.on(LifecycleEvent::End, move |_| first.borrow_mut().push("first"));

        let mut detached = bus.detach(LifecycleEvent::End);
        assert_eq!(bus.listener_count(LifecycleEvent::End), 0);

        let late = log.clone();
        bus.on(LifecycleEvent::End, move |_| late.borrow_mut().push("late"));

        for listener in detached.iter_mut() {
            listener(&());
        }
        bus.restore(LifecycleEvent::End, detached);

        assert_eq!(*log.borrow(), ["first"]);
        bus.emit(LifecycleEvent::End, &());
        assert_eq!(*log.borrow(), ["first", "first", "late"]);
    }
}
