//! Unkeyed event broadcast.
//!
//! A thin wrapper over [`EventPublisher`] with a single implicit topic.
//! Used where every subscriber wants every event, e.g. the session error
//! channel.

use crate::{EventPublisher, SubscriptionId};

/// Broadcast stream delivering every published event to every subscriber.
pub struct EventStream<E> {
    bus: EventPublisher<(), E>,
}

impl<E> EventStream<E> {
    pub fn new() -> Self {
        Self {
            bus: EventPublisher::new(),
        }
    }

    /// Registers `callback` for all future events.
    pub fn subscribe(
        &self,
        callback: impl Fn(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe((), callback)
    }

    /// Removes the subscription with the given id. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.bus.unsubscribe(&(), id)
    }

    /// Synchronously delivers `event` to every subscriber, in
    /// registration order. A no-op when nobody is subscribed.
    pub fn publish(&self, event: &E) {
        self.bus.publish(&(), event)
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count(&())
    }
}

impl<E> Default for EventStream<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_every_subscriber_sees_every_event() {
        let stream: EventStream<&str> = EventStream::new();
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen_a);
        stream.subscribe(move |e: &&str| sink.lock().unwrap().push(*e));
        let sink = Arc::clone(&seen_b);
        stream.subscribe(move |e: &&str| sink.lock().unwrap().push(*e));

        stream.publish(&"parse failed");

        assert_eq!(*seen_a.lock().unwrap(), vec!["parse failed"]);
        assert_eq!(*seen_b.lock().unwrap(), vec!["parse failed"]);
    }

    #[test]
    fn test_unsubscribe() {
        let stream: EventStream<u32> = EventStream::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = stream.subscribe(move |e: &u32| sink.lock().unwrap().push(*e));

        stream.publish(&1);
        stream.unsubscribe(id);
        stream.publish(&2);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(stream.subscriber_count(), 0);
    }
}
