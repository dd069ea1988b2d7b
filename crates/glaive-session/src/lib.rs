//! Connection lifecycle and message dispatch for Glaive.
//!
//! This crate owns the client's view of "being connected":
//!
//! 1. **State machine** — [`ConnectionState`] and the [`Connection`] that
//!    drives it over a pluggable transport.
//! 2. **Dispatch** — the [`MessageDispatcher`], a kind-keyed event bus fed
//!    exclusively by the connection's read loop.
//! 3. **Errors** — [`SessionError`], surfaced both as return values and on
//!    the connection's error channel.
//!
//! # How it fits in the stack
//!
//! ```text
//! Game logic / stores (above)  ← subscribe to dispatcher + state
//!     ↕
//! Session layer (this crate)   ← owns the transport handle and lifecycle
//!     ↕
//! Protocol + transport (below) ← bytes and typed messages
//! ```

mod connection;
mod dispatcher;
mod error;
mod state;

pub use connection::Connection;
pub use dispatcher::MessageDispatcher;
pub use error::SessionError;
pub use state::ConnectionState;
