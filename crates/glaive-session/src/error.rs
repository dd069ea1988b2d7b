//! Error types for the session layer.

use glaive_protocol::ProtocolError;

use crate::ConnectionState;

type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while driving a connection.
///
/// `NotConnected` and `AlreadyConnected` are caller mistakes, returned
/// directly. `Protocol` and `Transport` also flow through the
/// connection's error channel when they arise inside the read loop,
/// where there is no caller to return them to.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation requires a live connection.
    #[error("not connected (state is {0})")]
    NotConnected(ConnectionState),

    /// `connect` was called while a connection attempt or connection is
    /// already in progress.
    #[error("connect attempted while {0}")]
    AlreadyConnected(ConnectionState),

    /// The transport could not be opened; the connection is in the
    /// `Error` state.
    #[error("transport open failed: {0}")]
    TransportOpenFailed(#[source] BoxedCause),

    /// The transport reported a fault on a live connection.
    #[error("transport error: {0}")]
    Transport(#[source] BoxedCause),

    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
