//! Transport abstraction layer for Glaive.
//!
//! Provides the [`Transport`] and [`TransportHandle`] traits that abstract
//! over how bytes reach the game server. The session layer drives these;
//! it never touches a socket directly.
//!
//! Two implementations ship here:
//!
//! - [`WebSocketTransport`] (feature `websocket`, on by default) — the real
//!   thing, via `tokio-tungstenite`.
//! - [`ChannelTransport`] — an in-memory pair for tests and demos, with a
//!   scriptable peer standing in for the server.
//!
//! # Callback mapping
//!
//! The connection layer upstream thinks in terms of four transport events.
//! They map onto this surface as:
//!
//! ```text
//! open succeeded   ⇒ Transport::open resolving Ok
//! message arrived  ⇒ TransportHandle::recv → Ok(Some(bytes))
//! cleanly closed   ⇒ TransportHandle::recv → Ok(None)
//! transport error  ⇒ recv/send returning Err
//! ```

mod channel;
mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use channel::{ChannelHandle, ChannelPeer, ChannelTransport};
pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketHandle, WebSocketTransport};

use std::future::Future;

/// Opens connections to a game server.
///
/// The methods return explicit `impl Future + Send` (rather than using
/// `async fn` sugar) because the session layer drives handles from a
/// spawned task and needs the futures to be `Send`.
pub trait Transport: Send + Sync + 'static {
    /// The connection handle type produced by this transport.
    type Handle: TransportHandle;
    /// The error type for open failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens a connection to the given endpoint, presenting `token` as
    /// the caller's credential. Resolving `Ok` is the "transport opened"
    /// signal.
    fn open(
        &self,
        endpoint_key: &str,
        token: &str,
    ) -> impl Future<Output = Result<Self::Handle, Self::Error>> + Send;
}

/// A single open connection that can send and receive byte payloads.
pub trait TransportHandle: Send + Sync + 'static {
    /// The error type for send/receive failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends a payload to the server.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next payload from the server.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed; an `Err`
    /// reports a transport fault and does not by itself mean the
    /// connection is gone.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Requests connection close. Close is confirmed asynchronously:
    /// the connection is down when `recv` returns `Ok(None)`, not when
    /// this resolves.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
