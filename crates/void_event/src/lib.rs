//! # void_event - Component Event Delegates
//!
//! Per-component multicast delegates:
//! - Subscribers are invoked synchronously, before `broadcast` returns
//! - Delivery follows subscription order
//! - Events are never queued, reordered or coalesced
//!
//! Components own one [`Multicast`] per event type they publish; the
//! presentation layer and gameplay hooks subscribe to it.

use std::fmt;

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Event handler function type
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Multicast delegate for a single event type
pub struct Multicast<E: Event> {
    handlers: Vec<(SubscriberId, EventHandler<E>)>,
    next_subscriber_id: u64,
    broadcasts: u64,
}

impl<E: Event> Multicast<E> {
    /// Create an empty delegate
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_subscriber_id: 1,
            broadcasts: 0,
        }
    }

    /// Subscribe a handler; it runs after every handler subscribed before it
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Unsubscribe, returning whether the handler was present
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub_id, _)| *sub_id != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every subscriber, in subscription order
    pub fn broadcast(&mut self, event: &E) {
        self.broadcasts += 1;
        for (_, handler) in &self.handlers {
            handler(event);
        }
    }

    /// Remove all subscribers
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Total number of broadcasts issued, subscribed or not
    pub fn broadcast_count(&self) -> u64 {
        self.broadcasts
    }
}

impl<E: Event> Default for Multicast<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Multicast<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multicast")
            .field("subscribers", &self.handlers.len())
            .field("broadcasts", &self.broadcasts)
            .finish()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventHandler, Multicast, SubscriberId};
}
