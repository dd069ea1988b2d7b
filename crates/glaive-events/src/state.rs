//! Single-value state broadcast with replay-on-subscribe.
//!
//! [`state_channel`] returns a writer/reader pair over one shared value,
//! in the spirit of `tokio::sync::watch` but delivering through callbacks
//! instead of awaitable receivers: subscribers are plain closures invoked
//! synchronously on the publishing thread.
//!
//! The split is the access-control story: the component that owns the
//! state keeps the [`StateWriter`] private and hands out clones of the
//! [`StateReader`]. Consumers can observe but never mutate.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::SubscriptionId;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct Shared<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Shared<T> {
    /// A poisoned lock only means some subscriber panicked mid-callback;
    /// the registry itself is still consistent, so keep going.
    fn lock(shared: &Mutex<Self>) -> MutexGuard<'_, Self> {
        shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Creates a state channel holding `initial`, returning the writing and
/// reading halves.
pub fn state_channel<T: Clone + Send + Sync + 'static>(
    initial: T,
) -> (StateWriter<T>, StateReader<T>) {
    let shared = Arc::new(Mutex::new(Shared {
        value: initial,
        subscribers: Vec::new(),
        next_id: 1,
    }));
    (
        StateWriter {
            shared: Arc::clone(&shared),
        },
        StateReader { shared },
    )
}

// ---------------------------------------------------------------------------
// StateWriter
// ---------------------------------------------------------------------------

/// The mutating half of a state channel. Held only by the owning component.
pub struct StateWriter<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T: Clone> StateWriter<T> {
    /// Stores `value` and synchronously notifies every subscriber with it,
    /// in subscription (FIFO) order.
    ///
    /// The subscriber list is snapshotted before any callback runs, so a
    /// subscriber added from inside a callback does not receive the
    /// in-flight value, and callbacks are free to subscribe/unsubscribe
    /// without deadlocking.
    pub fn publish(&self, value: T) {
        let snapshot: Vec<Callback<T>> = {
            let mut inner = Shared::lock(&self.shared);
            inner.value = value.clone();
            inner
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect()
        };
        tracing::trace!(subscribers = snapshot.len(), "state published");
        for callback in snapshot {
            callback(&value);
        }
    }
}

// ---------------------------------------------------------------------------
// StateReader
// ---------------------------------------------------------------------------

/// The observing half of a state channel. Clone freely; every clone sees
/// the same value and the same subscriber registry.
pub struct StateReader<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

// Manual impl: `#[derive(Clone)]` would require `T: Clone` on the struct
// itself, which the Arc makes unnecessary.
impl<T> Clone for StateReader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone> StateReader<T> {
    /// Returns a snapshot of the current value.
    pub fn get(&self) -> T {
        Shared::lock(&self.shared).value.clone()
    }

    /// Registers `callback` for future updates, first invoking it
    /// synchronously with the current value (replay-on-subscribe).
    ///
    /// The replay happens before registration, outside the registry lock.
    pub fn subscribe(
        &self,
        callback: impl Fn(&T) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let callback: Callback<T> = Arc::new(callback);

        let current = Shared::lock(&self.shared).value.clone();
        callback(&current);

        let mut inner = Shared::lock(&self.shared);
        let id = SubscriptionId::new(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, callback));
        id
    }

    /// Removes the subscription with the given id. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        Shared::lock(&self.shared)
            .subscribers
            .retain(|(sid, _)| *sid != id);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Collects observed values so tests can assert on delivery order.
    fn recorder<T: Clone + Send + Sync + 'static>(
    ) -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &T| sink.lock().unwrap().push(value.clone()))
    }

    #[test]
    fn test_subscribe_replays_current_value_synchronously() {
        let (_writer, reader) = state_channel(42u32);
        let (seen, record) = recorder();

        reader.subscribe(record);

        // Replay happened during subscribe, before any publish.
        assert_eq!(*seen.lock().unwrap(), vec![42]);
    }

    #[test]
    fn test_replay_works_for_struct_values() {
        #[derive(Debug, Clone, PartialEq)]
        struct Stats {
            fps: u32,
            ping: u32,
        }

        let (_writer, reader) = state_channel(Stats { fps: 0, ping: 0 });
        let (seen, record) = recorder();
        reader.subscribe(record);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Stats { fps: 0, ping: 0 }]
        );
    }

    #[test]
    fn test_publish_updates_value_and_notifies() {
        let (writer, reader) = state_channel(0u32);
        let (seen, record) = recorder();
        reader.subscribe(record);

        writer.publish(1);
        writer.publish(2);

        assert_eq!(reader.get(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_subscribers_notified_in_subscription_order() {
        let (writer, reader) = state_channel(0u32);
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            reader.subscribe(move |value| {
                if *value == 9 {
                    order.lock().unwrap().push(label);
                }
            });
        }

        writer.publish(9);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let (writer, reader) = state_channel(0u32);
        let (seen, record) = recorder();
        let id = reader.subscribe(record);

        writer.publish(1);
        reader.unsubscribe(id);
        writer.publish(2);

        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let (writer, reader) = state_channel(0u32);
        let (seen, record) = recorder();
        let id = reader.subscribe(record);
        reader.unsubscribe(id);

        // Second removal of the same id: nothing to remove, nothing breaks.
        reader.unsubscribe(id);
        writer.publish(5);
        assert_eq!(*seen.lock().unwrap(), vec![0]);
    }

    #[test]
    fn test_subscriber_added_during_publish_misses_inflight_value() {
        let (writer, reader) = state_channel(0u32);
        let late_seen = Arc::new(Mutex::new(Vec::new()));

        let inner_reader = reader.clone();
        let late = Arc::clone(&late_seen);
        reader.subscribe(move |value| {
            if *value == 1 {
                // Subscribing mid-publish: the new callback must not see
                // the value currently being delivered.
                let late = Arc::clone(&late);
                inner_reader.subscribe(move |v| late.lock().unwrap().push(*v));
            }
        });

        writer.publish(1);
        // The late subscriber replayed the (already stored) value 1 on
        // subscribe, but was not part of the in-flight delivery pass.
        assert_eq!(*late_seen.lock().unwrap(), vec![1]);

        writer.publish(2);
        assert_eq!(*late_seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_readers_share_one_registry() {
        let (writer, reader) = state_channel(0u32);
        let (seen, record) = recorder();
        reader.clone().subscribe(record);

        writer.publish(3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 3]);
        assert_eq!(reader.get(), 3);
    }
}
