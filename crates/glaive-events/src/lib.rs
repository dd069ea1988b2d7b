//! Broadcast primitives for Glaive.
//!
//! Everything above the transport communicates through two primitives:
//!
//! - **State broadcast** ([`state_channel`]) — a single current value with
//!   replay-on-subscribe. Used for connection state: a late subscriber
//!   immediately learns what the state is right now.
//! - **Event broadcast** ([`EventPublisher`], [`EventStream`]) — fire-and-forget
//!   delivery to whoever is listening on a topic. Used for parsed game
//!   messages and for surfacing session errors.
//!
//! Both split capability in two: the component that owns a value holds the
//! writing half, consumers only ever see a read/subscribe surface. Neither
//! primitive buffers; delivery is synchronous, in subscription order, on
//! the thread that publishes.

mod event;
mod state;
mod stream;

pub use event::EventPublisher;
pub use state::{state_channel, StateReader, StateWriter};
pub use stream::EventStream;

use std::fmt;

/// Handle identifying one subscription, returned by every `subscribe`.
///
/// Rust closures have no usable identity, so subscriptions cannot be
/// removed "by callback" the way a dynamic-language event bus would do it.
/// Callers keep the id and pass it to `unsubscribe` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}
