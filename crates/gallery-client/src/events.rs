//! Session-change notifications.
//!
//! Identity providers own a [`SessionHub`] and publish to it whenever a
//! session is established or cleared.  Interested parties call
//! [`SessionHub::subscribe`] and keep the returned [`Subscription`] alive
//! for as long as they want to hear about changes.
//!
//! Every published session carries a version.  A handler is never called
//! with an older version than one it has already seen, so the snapshot
//! delivered on subscription cannot overtake a concurrent publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use gallery_shared::User;

/// Callback invoked with the signed-in user, or `None` after sign-out.
pub type SessionHandler = Box<dyn Fn(Option<&User>) + Send + Sync>;

struct Listener {
    handler: SessionHandler,
    /// Highest version handed to `handler` so far.
    delivered: Mutex<Option<u64>>,
}

impl Listener {
    fn new(handler: SessionHandler) -> Self {
        Self {
            handler,
            delivered: Mutex::new(None),
        }
    }

    /// Call the handler unless it already saw `version` or newer. Handlers
    /// must not publish to their own hub.
    fn deliver(&self, version: u64, user: Option<&User>) {
        let mut delivered = self.delivered.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*delivered, Some(seen) if seen >= version) {
            return;
        }
        *delivered = Some(version);
        (self.handler)(user);
    }
}

#[derive(Default)]
struct HubState {
    version: u64,
    current: Option<User>,
    listeners: HashMap<u64, Arc<Listener>>,
}

#[derive(Default)]
struct HubInner {
    state: Mutex<HubState>,
    next_id: AtomicU64,
}

impl HubInner {
    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry of session handlers plus the current session.
#[derive(Clone, Default)]
pub struct SessionHub {
    inner: Arc<HubInner>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<User> {
        self.inner.lock().current.clone()
    }

    /// Register `handler`. It is called right away with the current session,
    /// then on every change until the [`Subscription`] is dropped.
    pub fn subscribe(&self, handler: SessionHandler) -> Subscription {
        let listener = Arc::new(Listener::new(handler));
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        // registration and snapshot happen under one lock
        let (version, current) = {
            let mut state = self.inner.lock();
            state.listeners.insert(id, listener.clone());
            (state.version, state.current.clone())
        };

        listener.deliver(version, current.as_ref());

        Subscription {
            id,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Replace the current session and notify every handler.
    pub fn publish(&self, user: Option<User>) {
        let (version, listeners) = {
            let mut state = self.inner.lock();
            state.version += 1;
            state.current = user.clone();
            let listeners: Vec<Arc<Listener>> = state.listeners.values().cloned().collect();
            (state.version, listeners)
        };

        tracing::debug!(
            signed_in = user.is_some(),
            handlers = listeners.len(),
            version,
            "Auth state changed"
        );

        for listener in listeners {
            listener.deliver(version, user.as_ref());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

/// Handle returned by [`SessionHub::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    hub: Weak<HubInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.lock().listeners.remove(&self.id);
        }
    }
}
