//! Keyed event broadcast.
//!
//! An [`EventPublisher`] delivers events to the subscribers of one topic
//! key and nobody else. Glaive's message dispatcher is an instance keyed
//! by message kind; the key type is generic so tests and other layers can
//! key on whatever enum fits.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::SubscriptionId;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync + 'static>;

struct Registry<K, E> {
    topics: HashMap<K, Vec<(SubscriptionId, Callback<E>)>>,
    next_id: u64,
}

/// Topic-keyed synchronous event broadcast.
///
/// Delivery guarantees, for a given key:
/// - callbacks fire in registration (FIFO) order;
/// - only callbacks registered under that exact key fire;
/// - publishing with no subscribers is a silent no-op.
///
/// The callback list is snapshotted before delivery, so callbacks may
/// subscribe or unsubscribe without deadlocking; a callback added during
/// a publish does not receive the event being delivered.
pub struct EventPublisher<K, E> {
    inner: Mutex<Registry<K, E>>,
}

impl<K: Eq + Hash, E> EventPublisher<K, E> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                topics: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<K, E>> {
        // Same poisoning stance as the state channel: a panicking
        // subscriber does not corrupt the registry.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `callback` for events published under `key`.
    pub fn subscribe(
        &self,
        key: K,
        callback: impl Fn(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId::new(inner.next_id);
        inner.next_id += 1;
        inner
            .topics
            .entry(key)
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Removes the subscription with the given id from `key`'s topic.
    /// Unknown keys or ids are a no-op.
    pub fn unsubscribe(&self, key: &K, id: SubscriptionId) {
        let mut inner = self.lock();
        if let Some(subscribers) = inner.topics.get_mut(key) {
            subscribers.retain(|(sid, _)| *sid != id);
            if subscribers.is_empty() {
                inner.topics.remove(key);
            }
        }
    }

    /// Synchronously invokes every subscriber of `key` with `event`,
    /// in registration order.
    pub fn publish(&self, key: &K, event: &E) {
        let snapshot: Vec<Callback<E>> = {
            let inner = self.lock();
            match inner.topics.get(key) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|(_, cb)| Arc::clone(cb))
                    .collect(),
                None => return,
            }
        };
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of subscriptions currently registered under `key`.
    pub fn subscriber_count(&self, key: &K) -> usize {
        self.lock().topics.get(key).map_or(0, Vec::len)
    }
}

impl<K: Eq + Hash, E> Default for EventPublisher<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
