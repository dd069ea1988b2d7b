//! Error types for the transport layer.

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the connection failed (DNS, TCP, or handshake).
    #[error("open failed: {0}")]
    OpenFailed(#[source] std::io::Error),

    /// Sending a payload failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a payload failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The connection is closed; no further sends are possible.
    #[error("connection closed")]
    Closed,
}
