//! Change notification: an ordered list of subscribers with per-listener
//! error isolation.

use crate::log;

use super::state::{FarmState, Section};

/// What a listener is told about.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    /// A section of the tree changed (or `Section::All`).
    Changed(Section),
    /// The player reached `level`.
    LevelUp { level: u32, title: &'static str },
}

pub type ListenerError = Box<dyn std::error::Error>;
pub type Listener = Box<dyn FnMut(&FarmState, &StoreEvent) -> Result<(), ListenerError>>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId(u64);

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriberId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriberId
    where
        F: FnMut(&FarmState, &StoreEvent) -> Result<(), ListenerError> + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Call every listener in subscription order. A failing listener is
    /// logged and skipped; the rest still run. Returns the failure count.
    pub fn dispatch(&mut self, state: &FarmState, event: &StoreEvent) -> usize {
        let mut failures = 0;
        for (id, listener) in &mut self.subscribers {
            if let Err(e) = listener(state, event) {
                failures += 1;
                log::warn(&format!("listener {:?} failed on {:?}: {e}", id, event));
            }
        }
        failures
    }
}
