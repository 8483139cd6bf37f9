//! In-process notification bus
//!
//! Components that display list contents subscribe here and re-fetch when a
//! list changes. The bus is an ordinary value: create one and hand clones to
//! whoever needs it. Delivery is synchronous and in registration order; there
//! is no buffering, so a listener only sees events emitted while it is
//! registered.

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Names listeners subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// Some collection gained or lost a book
    #[serde(rename = "booksUpdated")]
    BooksUpdated,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::BooksUpdated => "booksUpdated",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An emitted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    BooksUpdated { user: UserId },
}

impl ListEvent {
    pub fn name(&self) -> EventName {
        match self {
            ListEvent::BooksUpdated { .. } => EventName::BooksUpdated,
        }
    }

    /// The user whose lists changed
    pub fn user(&self) -> &UserId {
        match self {
            ListEvent::BooksUpdated { user } => user,
        }
    }
}

type Handler = Arc<dyn Fn(&ListEvent) + Send + Sync>;

struct Listener {
    id: u64,
    name: EventName,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panicking handler never runs under the lock, so the data is intact
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Publish/subscribe hub for list notifications
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event name.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe<F>(&self, name: EventName, handler: F) -> Subscription
    where
        F: Fn(&ListEvent) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push(Listener {
            id,
            name,
            handler: Arc::new(handler),
        });
        tracing::trace!("listener {} subscribed to {}", id, name);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver an event to every current listener of its name.
    ///
    /// Returns the number of handlers called.
    pub fn emit(&self, event: ListEvent) -> usize {
        let name = event.name();
        let handlers: Vec<Handler> = lock(&self.registry)
            .listeners
            .iter()
            .filter(|l| l.name == name)
            .map(|l| Arc::clone(&l.handler))
            .collect();

        tracing::debug!("emit {} for {} to {} listeners", name, event.user(), handlers.len());
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        lock(&self.registry)
            .listeners
            .iter()
            .filter(|l| l.name == name)
            .count()
    }
}

/// Handle to a registered listener; dropping it unregisters the listener
#[must_use = "dropping a Subscription unsubscribes its handler immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.retain(|l| l.id != self.id);
            tracing::trace!("listener {} unsubscribed", self.id);
        }
    }
}
