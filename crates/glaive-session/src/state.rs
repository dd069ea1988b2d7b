//! Connection lifecycle states.

use std::fmt;

/// The lifecycle state of a [`Connection`](crate::Connection).
///
/// ```text
/// Created ──connect()──→ Connecting ──open ok──→ Connected
///                            │                      │
///                         open err            disconnect()
///                            │                      │
///                            ▼                      ▼
///                          Error              Disconnecting
///                                                   │
///                        Connected/Disconnecting ──close──→ Disconnected
/// ```
///
/// Transport faults are reported on the error channel but never move the
/// machine; only open and close do. `Disconnected` and `Error` leave the
/// machine via a fresh `connect` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Fresh connection object; `connect` has not been called.
    Created,
    /// `connect` was called; the transport open is in flight.
    Connecting,
    /// The transport is open and commands can be sent.
    Connected,
    /// The last connect attempt failed to open the transport.
    Error,
    /// `disconnect` was called; waiting for the close confirmation.
    Disconnecting,
    /// The transport reported the connection closed.
    Disconnected,
}

impl ConnectionState {
    /// Whether `connect` is legal from this state.
    pub fn can_connect(self) -> bool {
        matches!(
            self,
            ConnectionState::Created
                | ConnectionState::Disconnected
                | ConnectionState::Error
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Created => "CREATED",
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Connected => "CONNECTED",
            ConnectionState::Error => "ERROR",
            ConnectionState::Disconnecting => "DISCONNECTING",
            ConnectionState::Disconnected => "DISCONNECTED",
        };
        f.write_str(name)
    }
}
