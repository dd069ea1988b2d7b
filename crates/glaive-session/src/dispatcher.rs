//! The message dispatcher: kind-keyed fan-out of parsed messages.
//!
//! One dispatcher instance serves one connection. It is constructed
//! explicitly and handed to both the [`Connection`](crate::Connection)
//! (which publishes into it from the read loop) and to consumers (which
//! subscribe by message kind). No global instance exists, so independent
//! connections and tests never leak subscribers into each other.

use std::sync::Arc;

use glaive_events::{EventPublisher, SubscriptionId};
use glaive_protocol::{Message, MessageKind};

/// Kind-keyed event bus carrying parsed inbound messages.
///
/// Clones share one subscriber registry. Delivery is synchronous on the
/// publishing task, in subscription order, and preserves the order the
/// transport delivered the underlying bytes — the dispatcher adds no
/// buffering, filtering, or reordering.
#[derive(Clone)]
pub struct MessageDispatcher {
    bus: Arc<EventPublisher<MessageKind, Message>>,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self {
            bus: Arc::new(EventPublisher::new()),
        }
    }

    /// Registers `callback` for messages of the given kind.
    pub fn subscribe(
        &self,
        kind: MessageKind,
        callback: impl Fn(&Message) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, callback)
    }

    /// Removes a subscription. Unknown ids are a no-op.
    pub fn unsubscribe(&self, kind: MessageKind, id: SubscriptionId) {
        self.bus.unsubscribe(&kind, id)
    }

    /// Delivers `message` to the subscribers of its kind. A no-op when
    /// nobody subscribed to that kind.
    pub fn publish(&self, message: &Message) {
        self.bus.publish(&message.kind(), message)
    }

    /// Number of subscriptions for a kind.
    pub fn subscriber_count(&self, kind: MessageKind) -> usize {
        self.bus.subscriber_count(&kind)
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
